//! Export and import of the session documents.
//!
//! Exports are pretty-printed JSON. Key order follows struct declaration order
//! and skills are kept sorted, so the same document always yields the same
//! bytes. Dates are rendered by chrono as ISO-8601 `YYYY-MM-DD`.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use tracing::info;

use crate::documents::models::{DocumentKind, EntryId, PortfolioDocument, ResumeDocument};
use crate::documents::store::{portfolio_ids, resume_ids, DocumentStore, StoreError};

pub const EXPORT_CONTENT_TYPE: &str = "application/json";

impl DocumentStore {
    /// Serializes one root document to a downloadable snapshot.
    pub fn export_document(&self, kind: DocumentKind) -> Result<Vec<u8>, StoreError> {
        let bytes = match kind {
            DocumentKind::Resume => serde_json::to_vec_pretty(self.resume())?,
            DocumentKind::Portfolio => serde_json::to_vec_pretty(self.portfolio())?,
        };
        Ok(bytes)
    }

    /// Loads a previously exported document, replacing the current one.
    pub fn import_document(&mut self, kind: DocumentKind, bytes: &[u8]) -> Result<(), StoreError> {
        match kind {
            DocumentKind::Resume => {
                let resume = parse_resume(bytes)?;
                self.replace_resume(resume);
            }
            DocumentKind::Portfolio => {
                let portfolio = parse_portfolio(bytes)?;
                self.replace_portfolio(portfolio);
            }
        }
        info!("Imported {} document ({} bytes)", kind.as_str(), bytes.len());
        Ok(())
    }
}

pub fn parse_resume(bytes: &[u8]) -> Result<ResumeDocument, StoreError> {
    let resume: ResumeDocument = serde_json::from_slice(bytes)?;
    ensure_unique(resume_ids(&resume))?;
    Ok(resume)
}

pub fn parse_portfolio(bytes: &[u8]) -> Result<PortfolioDocument, StoreError> {
    let portfolio: PortfolioDocument = serde_json::from_slice(bytes)?;
    ensure_unique(portfolio_ids(&portfolio))?;
    Ok(portfolio)
}

fn ensure_unique(ids: impl Iterator<Item = EntryId>) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(StoreError::DuplicateId(id));
        }
    }
    Ok(())
}

/// `resume_<YYYYMMDD>_<HHMMSS>.json` (or `portfolio_...`).
pub fn export_file_name(kind: DocumentKind, at: NaiveDateTime) -> String {
    format!("{}_{}.json", kind.as_str(), at.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::models::{
        Achievement, CertificationEntry, CollectionKind, EducationEntry, EntryData,
        ExperienceEntry, ExperienceField, FieldUpdate, PersonalInfo, ProjectEntry, ProjectField,
        ProjectImage, ResumeProject,
    };
    use chrono::NaiveDate;
    use serde_json::Value;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn resume_round_trip(store: &DocumentStore) -> ResumeDocument {
        let bytes = store.export_document(DocumentKind::Resume).unwrap();
        parse_resume(&bytes).unwrap()
    }

    fn portfolio_round_trip(store: &DocumentStore) -> PortfolioDocument {
        let bytes = store.export_document(DocumentKind::Portfolio).unwrap();
        parse_portfolio(&bytes).unwrap()
    }

    #[test]
    fn test_empty_documents_round_trip() {
        let store = DocumentStore::new();
        assert_eq!(&resume_round_trip(&store), store.resume());
        assert_eq!(&portfolio_round_trip(&store), store.portfolio());
    }

    #[test]
    fn test_entries_with_empty_fields_round_trip() {
        let mut store = DocumentStore::new();
        store.add_entry(EntryData::Experience(ExperienceEntry::default()));
        store.add_entry(EntryData::Education(EducationEntry::default()));
        store.add_entry(EntryData::ResumeProject(ResumeProject::default()));
        store.add_entry(EntryData::PortfolioProject(ProjectEntry::default()));
        store.add_entry(EntryData::Achievement(Achievement::default()));
        store.add_entry(EntryData::Certification(CertificationEntry::default()));
        store.update_personal_info(PersonalInfo {
            name: Some(String::new()),
            ..Default::default()
        });

        assert_eq!(&resume_round_trip(&store), store.resume());
        assert_eq!(&portfolio_round_trip(&store), store.portfolio());
    }

    #[test]
    fn test_populated_documents_round_trip() {
        let mut store = DocumentStore::new();
        store.update_personal_info(PersonalInfo {
            name: Some("Grace Hopper".into()),
            email: Some("grace@navy.mil".into()),
            github: Some("github.com/grace".into()),
            ..Default::default()
        });
        store.set_summary(Some("Compiler pioneer.".into()));
        store.add_skills("COBOL, Compilers, Leadership");
        store.add_entry(EntryData::Experience(ExperienceEntry {
            title: "Rear Admiral".into(),
            company: "US Navy".into(),
            start_date: date(1967, 8, 1),
            end_date: date(1986, 8, 14),
            description: "Standardized COBOL across the Navy.".into(),
            current: false,
        }));
        let project = store.add_entry(EntryData::PortfolioProject(ProjectEntry {
            title: "A-0".into(),
            technologies: "UNIVAC, assembly".into(),
            live_url: "https://example.com/a0".into(),
            ..Default::default()
        }));
        store
            .update_field(
                project,
                FieldUpdate::PortfolioProject(ProjectField::Image(Some(ProjectImage {
                    file_name: "a0.png".into(),
                    content_type: "image/png".into(),
                    data: vec![1, 2, 3, 250],
                }))),
            )
            .unwrap();

        assert_eq!(&resume_round_trip(&store), store.resume());
        assert_eq!(&portfolio_round_trip(&store), store.portfolio());
    }

    #[test]
    fn test_current_experience_exports_null_end_date() {
        let mut store = DocumentStore::new();
        let first = store.add_entry(EntryData::Experience(ExperienceEntry {
            start_date: date(2023, 1, 1),
            end_date: date(2023, 12, 31),
            ..Default::default()
        }));
        store.add_entry(EntryData::Experience(ExperienceEntry {
            start_date: date(2021, 3, 1),
            end_date: date(2022, 12, 31),
            ..Default::default()
        }));
        store
            .update_field(first, FieldUpdate::Experience(ExperienceField::Current(true)))
            .unwrap();

        let bytes = store.export_document(DocumentKind::Resume).unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        let experience = json["experience"].as_array().unwrap();
        assert_eq!(experience[0]["current"], true);
        assert!(experience[0]["end_date"].is_null());
        assert_eq!(experience[1]["end_date"], "2022-12-31");
        assert_eq!(experience[1]["start_date"], "2021-03-01");

        let parsed = parse_resume(&bytes).unwrap();
        assert_eq!(&parsed, store.resume());
    }

    #[test]
    fn test_export_is_deterministic() {
        let mut a = DocumentStore::new();
        a.add_skills("Zig, Ada, Rust");
        let mut b = DocumentStore::new();
        b.add_skills("Rust, Zig, Ada");
        assert_eq!(
            a.export_document(DocumentKind::Resume).unwrap(),
            b.export_document(DocumentKind::Resume).unwrap()
        );
    }

    #[test]
    fn test_export_entries_carry_ids() {
        let mut store = DocumentStore::new();
        let id = store.add_entry(EntryData::Achievement(Achievement {
            text: "Won the hackathon".into(),
        }));
        let json: Value =
            serde_json::from_slice(&store.export_document(DocumentKind::Portfolio).unwrap())
                .unwrap();
        assert_eq!(json["achievements"][0]["id"], id.0);
        assert_eq!(json["achievements"][0]["text"], "Won the hackathon");
    }

    #[test]
    fn test_parse_rejects_duplicate_ids() {
        let bytes = br#"{"achievements":[{"id":1,"text":"a"}],"projects":[{"id":1,"title":"b"}]}"#;
        assert!(matches!(
            parse_portfolio(bytes),
            Err(StoreError::DuplicateId(EntryId(1)))
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse_resume(b"{not json"),
            Err(StoreError::Malformed(_))
        ));
    }

    #[test]
    fn test_import_normalizes_current_experience() {
        let bytes = br#"{"experience":[{"id":7,"current":true,"end_date":"2020-01-01"}]}"#;
        let mut store = DocumentStore::new();
        store.import_document(DocumentKind::Resume, bytes).unwrap();
        let id = store.resume().experience.ids().next().unwrap();
        assert_eq!(id, EntryId(1));
        assert_eq!(store.resume().experience.get(id).unwrap().end_date, None);

        let next = store.add_entry(EntryData::Experience(ExperienceEntry::default()));
        assert_eq!(next, EntryId(2));
    }

    #[test]
    fn test_import_does_not_revive_removed_id() {
        let mut store = DocumentStore::new();
        store.add_entry(EntryData::Experience(ExperienceEntry::default()));
        let removed = store.add_entry(EntryData::Experience(ExperienceEntry::default()));
        store.remove_entry(CollectionKind::Experience, removed);

        let bytes = br#"{"experience":[{"id":2,"title":"imported"}]}"#;
        store.import_document(DocumentKind::Resume, bytes).unwrap();

        assert!(store.resume().experience.get(removed).is_none());
        store.remove_entry(CollectionKind::Experience, removed);
        let titles: Vec<_> = store
            .resume()
            .experience
            .iter()
            .map(|s| s.entry.title.as_str())
            .collect();
        assert_eq!(titles, vec!["imported"]);
    }

    #[test]
    fn test_export_file_name_pattern() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 30)
            .unwrap();
        assert_eq!(
            export_file_name(DocumentKind::Resume, at),
            "resume_20240309_070530.json"
        );
        assert_eq!(
            export_file_name(DocumentKind::Portfolio, at),
            "portfolio_20240309_070530.json"
        );
    }
}
