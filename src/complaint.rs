//! Complaint form summaries

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write;

/// File name suggested for the downloaded summary
pub const SUMMARY_FILE_NAME: &str = "ringkasan_aduan.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplaintKind {
    Kesehatan,
    Perundungan,
    Kekerasan,
    Pelecehan,
}

impl ComplaintKind {
    pub fn label(self) -> &'static str {
        match self {
            ComplaintKind::Kesehatan => "Aduan Kesehatan",
            ComplaintKind::Perundungan => "Aduan Tindak Perundungan",
            ComplaintKind::Kekerasan => "Aduan Tindak Kekerasan",
            ComplaintKind::Pelecehan => "Aduan Tindak Pelecehan",
        }
    }
}

impl fmt::Display for ComplaintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Extra fields for a health complaint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDetails {
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub medical_history: String,
}

/// Extra fields for bullying, violence and harassment reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentDetails {
    #[serde(default)]
    pub perpetrator: String,
    #[serde(default)]
    pub witnesses: String,
    #[serde(default)]
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    pub kind: ComplaintKind,
    #[serde(default)]
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    /// Read only for [`ComplaintKind::Kesehatan`]
    #[serde(default)]
    pub health: HealthDetails,
    /// Read for every other kind
    #[serde(default)]
    pub incident: IncidentDetails,
    /// Name of an uploaded evidence file
    #[serde(default)]
    pub evidence: Option<String>,
}

/// Render the plain-text "Ringkasan Aduan" document
pub fn render_summary(complaint: &Complaint) -> String {
    let name = match complaint.name.trim() {
        "" => "Anonim",
        name => name,
    };

    let mut out = String::from("Ringkasan Aduan:\n----------------\n");
    // Writing into a String cannot fail
    let _ = writeln!(out, "Jenis Aduan: {}", complaint.kind);
    let _ = writeln!(out, "Nama: {name}");
    let _ = writeln!(out, "Tanggal Kejadian: {}", complaint.date.format("%Y-%m-%d"));
    let _ = writeln!(out, "Lokasi: {}", complaint.location);
    let _ = writeln!(out, "Deskripsi: {}", complaint.description);

    out.push('\n');
    if complaint.kind == ComplaintKind::Kesehatan {
        let health = &complaint.health;
        let _ = writeln!(out, "Masalah Kesehatan: {}", health.issue);
        let _ = writeln!(out, "Gejala: {}", health.symptoms);
        let _ = writeln!(out, "Riwayat Medis: {}", health.medical_history);
    } else {
        let incident = &complaint.incident;
        let _ = writeln!(out, "Pelaku: {}", incident.perpetrator);
        let _ = writeln!(out, "Saksi: {}", incident.witnesses);
        let _ = writeln!(out, "Dampak: {}", incident.impact);
    }

    if let Some(evidence) = complaint.evidence.as_deref().filter(|e| !e.trim().is_empty()) {
        let _ = writeln!(out, "\nBukti telah diunggah: {evidence}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complaint(kind: ComplaintKind) -> Complaint {
        Complaint {
            kind,
            name: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            location: "Sekolah".to_string(),
            description: "Diejek setiap hari".to_string(),
            health: HealthDetails::default(),
            incident: IncidentDetails {
                perpetrator: "Tidak Diketahui".to_string(),
                witnesses: "Budi, Sari".to_string(),
                impact: "Takut berangkat".to_string(),
            },
            evidence: None,
        }
    }

    #[test]
    fn test_incident_summary() {
        let text = render_summary(&complaint(ComplaintKind::Perundungan));

        assert!(text.starts_with("Ringkasan Aduan:\n----------------\n"));
        assert!(text.contains("Jenis Aduan: Aduan Tindak Perundungan\n"));
        assert!(text.contains("Nama: Anonim\n"));
        assert!(text.contains("Tanggal Kejadian: 2024-06-01\n"));
        assert!(text.contains("Saksi: Budi, Sari\n"));
        assert!(!text.contains("Masalah Kesehatan"));
        assert!(!text.contains("Bukti"));
    }

    #[test]
    fn test_health_summary_ignores_incident_fields() {
        let mut c = complaint(ComplaintKind::Kesehatan);
        c.name = "Rani".to_string();
        c.health.issue = "Sakit kepala".to_string();
        c.evidence = Some("surat_dokter.pdf".to_string());

        let text = render_summary(&c);
        assert!(text.contains("Nama: Rani\n"));
        assert!(text.contains("Masalah Kesehatan: Sakit kepala\n"));
        assert!(!text.contains("Pelaku"));
        assert!(text.ends_with("Bukti telah diunggah: surat_dokter.pdf\n"));
    }

    #[test]
    fn test_complaint_from_partial_json() {
        let c: Complaint = serde_json::from_value(serde_json::json!({
            "kind": "Kekerasan",
            "date": "2024-06-01",
            "description": "Dipukul"
        }))
        .unwrap();
        assert_eq!(c.kind, ComplaintKind::Kekerasan);
        assert!(c.name.is_empty());
        assert_eq!(c.evidence, None);
    }
}
