//! Fixed questionnaire: 25 questions, 5 answer options, 12 categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of questions in a complete assessment
pub const QUESTION_COUNT: usize = 25;

/// Highest ordinal an answer can take
pub const MAX_ANSWER: u8 = 4;

pub const QUESTIONS: [&str; QUESTION_COUNT] = [
    "Saya merasa cemas atau tegang.",
    "Saya merasa sedih atau tertekan.",
    "Saya kesulitan tidur atau tidur terlalu banyak.",
    "Saya merasa lelah atau kurang berenergi.",
    "Saya kehilangan minat pada aktivitas yang biasanya saya nikmati.",
    "Saya merasa sulit berkonsentrasi.",
    "Saya merasa gelisah atau tidak bisa diam.",
    "Saya merasa tidak berharga atau bersalah.",
    "Saya memiliki pikiran untuk menyakiti diri sendiri.",
    "Saya merasa mudah tersinggung atau marah.",
    "Saya mengalami perubahan nafsu makan yang signifikan.",
    "Saya merasa sulit mengambil keputusan.",
    "Saya merasa kesepian meskipun dikelilingi orang lain.",
    "Saya merasa khawatir tentang masa depan.",
    "Saya mengalami gejala fisik seperti sakit kepala atau sakit perut tanpa sebab medis yang jelas.",
    "Saya merasa sulit mengendalikan kekhawatiran saya.",
    "Saya merasa tidak memiliki harapan tentang masa depan.",
    "Saya merasa tidak nyaman dalam situasi sosial.",
    "Saya mengalami serangan panik atau kecemasan yang intens.",
    "Saya merasa sulit menikmati hal-hal kecil dalam hidup.",
    "Saya merasa terbebani oleh tanggung jawab sehari-hari.",
    "Saya merasa sulit rileks atau santai.",
    "Saya merasa tidak puas dengan diri sendiri.",
    "Saya merasa sulit menyelesaikan tugas-tugas sehari-hari.",
    "Saya merasa hidup tidak berarti atau tidak memiliki tujuan.",
];

/// Answer labels, indexed by ordinal
pub const ANSWER_OPTIONS: [&str; MAX_ANSWER as usize + 1] =
    ["Tidak pernah", "Jarang", "Kadang-kadang", "Sering", "Sangat sering"];

/// Symptom cluster a question contributes to.
///
/// Ordering follows declaration order, which is also [`Category::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Kecemasan")]
    Kecemasan,
    #[serde(rename = "Depresi")]
    Depresi,
    #[serde(rename = "Gangguan Tidur")]
    GangguanTidur,
    #[serde(rename = "Kelelahan")]
    Kelelahan,
    #[serde(rename = "Konsentrasi")]
    Konsentrasi,
    #[serde(rename = "Harga Diri")]
    HargaDiri,
    #[serde(rename = "Emosi")]
    Emosi,
    #[serde(rename = "Nafsu Makan")]
    NafsuMakan,
    #[serde(rename = "Sosial")]
    Sosial,
    #[serde(rename = "Kecemasan Masa Depan")]
    KecemasanMasaDepan,
    #[serde(rename = "Gejala Fisik")]
    GejalaFisik,
    #[serde(rename = "Kebahagiaan")]
    Kebahagiaan,
}

impl Category {
    /// All categories in report order
    pub const ALL: [Category; 12] = [
        Category::Kecemasan,
        Category::Depresi,
        Category::GangguanTidur,
        Category::Kelelahan,
        Category::Konsentrasi,
        Category::HargaDiri,
        Category::Emosi,
        Category::NafsuMakan,
        Category::Sosial,
        Category::KecemasanMasaDepan,
        Category::GejalaFisik,
        Category::Kebahagiaan,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Kecemasan => "Kecemasan",
            Category::Depresi => "Depresi",
            Category::GangguanTidur => "Gangguan Tidur",
            Category::Kelelahan => "Kelelahan",
            Category::Konsentrasi => "Konsentrasi",
            Category::HargaDiri => "Harga Diri",
            Category::Emosi => "Emosi",
            Category::NafsuMakan => "Nafsu Makan",
            Category::Sosial => "Sosial",
            Category::KecemasanMasaDepan => "Kecemasan Masa Depan",
            Category::GejalaFisik => "Gejala Fisik",
            Category::Kebahagiaan => "Kebahagiaan",
        }
    }

    /// Zero-based question indices averaged into this category.
    ///
    /// Scoring does not assume the lists partition the questionnaire.
    pub fn question_indices(self) -> &'static [usize] {
        match self {
            Category::Kecemasan => &[0, 6, 15, 18, 21],
            Category::Depresi => &[1, 4, 7, 16, 24],
            Category::GangguanTidur => &[2],
            Category::Kelelahan => &[3],
            Category::Konsentrasi => &[5, 11],
            Category::HargaDiri => &[8, 22],
            Category::Emosi => &[9, 19],
            Category::NafsuMakan => &[10],
            Category::Sosial => &[12, 17],
            Category::KecemasanMasaDepan => &[13],
            Category::GejalaFisik => &[14],
            Category::Kebahagiaan => &[20, 23],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Label for an answer ordinal, if in range
pub fn option_label(ordinal: u8) -> Option<&'static str> {
    ANSWER_OPTIONS.get(usize::from(ordinal)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_category_indices_are_in_range_and_unique() {
        for category in Category::ALL {
            let indices = category.question_indices();
            assert!(!indices.is_empty(), "{category} has no questions");
            assert!(indices.iter().all(|&i| i < QUESTION_COUNT));
            let unique: HashSet<_> = indices.iter().collect();
            assert_eq!(unique.len(), indices.len(), "{category} repeats an index");
        }
    }

    #[test]
    fn test_single_question_categories() {
        let singles: Vec<_> = Category::ALL
            .into_iter()
            .filter(|c| c.question_indices().len() == 1)
            .map(Category::display_name)
            .collect();

        assert_eq!(
            singles,
            vec![
                "Gangguan Tidur",
                "Kelelahan",
                "Nafsu Makan",
                "Kecemasan Masa Depan",
                "Gejala Fisik"
            ]
        );
    }

    #[test]
    fn test_category_serializes_as_display_name() {
        let json = serde_json::to_string(&Category::KecemasanMasaDepan).unwrap();
        assert_eq!(json, "\"Kecemasan Masa Depan\"");
    }

    #[test]
    fn test_option_labels() {
        assert_eq!(option_label(0), Some("Tidak pernah"));
        assert_eq!(option_label(4), Some("Sangat sering"));
        assert_eq!(option_label(5), None);
    }
}
