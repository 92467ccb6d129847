//! Plain-text result document offered for download

use super::catalog::{option_label, QUESTIONS};
use super::scorer::{Answers, ScoreReport, TIMESTAMP_FORMAT};
use std::fmt::Write;

/// File name suggested for the downloaded report
pub const REPORT_FILE_NAME: &str = "hasil_tes_kesehatan_mental_komprehensif.txt";

/// Render a report together with the answers that produced it
pub fn render_report(report: &ScoreReport, answers: &Answers) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "Hasil Tes Kesehatan Mental Komprehensif\n");
    let _ = writeln!(out, "Tanggal: {}\n", report.timestamp.format(TIMESTAMP_FORMAT));
    let _ = writeln!(
        out,
        "Skor Total: {} dari {}",
        report.total_score,
        QUESTIONS.len() * 4
    );
    let _ = writeln!(out, "Persentase: {:.2}%\n", report.percentage);
    let _ = writeln!(out, "Analisis Umum: {}\n", report.severity_tier.narrative());

    out.push_str("Analisis per Kategori:\n");
    for (category, score) in &report.category_scores {
        let _ = writeln!(out, "- {category}: {score:.2}%");
    }

    out.push_str("\nDetail Jawaban:\n");
    for (question, &answer) in QUESTIONS.iter().zip(answers.as_slice()) {
        let _ = writeln!(out, "- {question}: {}", option_label(answer).unwrap_or("-"));
    }

    out.push_str("\nCatatan: Hasil tes ini tidak menggantikan diagnosis profesional. ");
    out.push_str("Jika Anda memiliki kekhawatiran tentang kesehatan mental Anda, ");
    out.push_str("silakan konsultasikan dengan profesional kesehatan mental.");
    out
}
