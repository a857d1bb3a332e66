use thiserror::Error;
use tracing::debug;

use crate::documents::models::{
    CollectionKind, EntryData, EntryId, FieldUpdate, PersonalInfo, PortfolioDocument,
    ResumeDocument,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Entry {id} not found in {collection}")]
    NotFound {
        collection: CollectionKind,
        id: EntryId,
    },

    #[error("Malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Duplicate entry id {0} in imported document")]
    DuplicateId(EntryId),
}

/// Session-scoped owner of the resume and portfolio documents.
///
/// All collections share one id counter; an `EntryId` handed out by the store is
/// never handed out again, even after the entry is removed or a document is
/// imported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentStore {
    resume: ResumeDocument,
    portfolio: PortfolioDocument,
    next_id: u64,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resume(&self) -> &ResumeDocument {
        &self.resume
    }

    pub fn portfolio(&self) -> &PortfolioDocument {
        &self.portfolio
    }

    fn allocate_id(&mut self) -> EntryId {
        let mut allocate = id_allocator(&mut self.next_id);
        allocate()
    }

    /// Appends a new entry to the collection named by `defaults`.
    pub fn add_entry(&mut self, defaults: EntryData) -> EntryId {
        let id = self.allocate_id();
        let kind = defaults.kind();
        match defaults {
            EntryData::Experience(e) => self.resume.experience.push(id, e),
            EntryData::Education(e) => self.resume.education.push(id, e),
            EntryData::ResumeProject(e) => self.resume.projects.push(id, e),
            EntryData::PortfolioProject(e) => self.portfolio.projects.push(id, e),
            EntryData::Achievement(e) => self.portfolio.achievements.push(id, e),
            EntryData::Certification(e) => self.portfolio.certifications.push(id, e),
        }
        debug!("Added entry {id} to {kind}");
        id
    }

    pub fn update_field(&mut self, id: EntryId, update: FieldUpdate) -> Result<(), StoreError> {
        let collection = update.kind();
        let found = match update {
            FieldUpdate::Experience(f) => self.resume.experience.update(id, f),
            FieldUpdate::Education(f) => self.resume.education.update(id, f),
            FieldUpdate::ResumeProject(f) => self.resume.projects.update(id, f),
            FieldUpdate::PortfolioProject(f) => self.portfolio.projects.update(id, f),
            FieldUpdate::Achievement(f) => self.portfolio.achievements.update(id, f),
            FieldUpdate::Certification(f) => self.portfolio.certifications.update(id, f),
        };
        if found {
            Ok(())
        } else {
            Err(StoreError::NotFound { collection, id })
        }
    }

    pub fn contains(&self, collection: CollectionKind, id: EntryId) -> bool {
        match collection {
            CollectionKind::Experience => self.resume.experience.get(id).is_some(),
            CollectionKind::Education => self.resume.education.get(id).is_some(),
            CollectionKind::ResumeProjects => self.resume.projects.get(id).is_some(),
            CollectionKind::PortfolioProjects => self.portfolio.projects.get(id).is_some(),
            CollectionKind::Achievements => self.portfolio.achievements.get(id).is_some(),
            CollectionKind::Certifications => self.portfolio.certifications.get(id).is_some(),
        }
    }

    /// Removes an entry. A stale or repeated removal is a no-op.
    pub fn remove_entry(&mut self, collection: CollectionKind, id: EntryId) {
        let removed = match collection {
            CollectionKind::Experience => self.resume.experience.remove(id),
            CollectionKind::Education => self.resume.education.remove(id),
            CollectionKind::ResumeProjects => self.resume.projects.remove(id),
            CollectionKind::PortfolioProjects => self.portfolio.projects.remove(id),
            CollectionKind::Achievements => self.portfolio.achievements.remove(id),
            CollectionKind::Certifications => self.portfolio.certifications.remove(id),
        };
        if !removed {
            debug!("Remove of absent entry {id} from {collection} ignored");
        }
    }

    /// Inserts a trimmed skill. Returns true if it was not already present.
    pub fn add_skill(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.resume.skills.insert(name.to_string())
    }

    /// Adds every comma-separated skill in `input`, returning how many were new.
    pub fn add_skills(&mut self, input: &str) -> usize {
        input
            .split(',')
            .filter(|skill| self.add_skill(skill))
            .count()
    }

    pub fn remove_skill(&mut self, name: &str) -> bool {
        self.resume.skills.remove(name.trim())
    }

    pub fn update_personal_info(&mut self, patch: PersonalInfo) {
        self.resume.personal_info.merge(patch);
    }

    pub fn set_summary(&mut self, summary: Option<String>) {
        self.resume.summary = summary.filter(|s| !s.trim().is_empty());
    }

    /// Replaces the resume with an imported one. Imported entries get fresh ids
    /// so a removed id can never resolve again.
    pub fn replace_resume(&mut self, mut resume: ResumeDocument) {
        resume.experience.normalize_all();
        let mut allocate = id_allocator(&mut self.next_id);
        resume.experience.reassign_ids(&mut allocate);
        resume.education.reassign_ids(&mut allocate);
        resume.projects.reassign_ids(&mut allocate);
        self.resume = resume;
    }

    pub fn replace_portfolio(&mut self, mut portfolio: PortfolioDocument) {
        let mut allocate = id_allocator(&mut self.next_id);
        portfolio.projects.reassign_ids(&mut allocate);
        portfolio.achievements.reassign_ids(&mut allocate);
        portfolio.certifications.reassign_ids(&mut allocate);
        self.portfolio = portfolio;
    }
}

fn id_allocator(next_id: &mut u64) -> impl FnMut() -> EntryId + '_ {
    move || {
        *next_id += 1;
        EntryId(*next_id)
    }
}

pub(crate) fn resume_ids(resume: &ResumeDocument) -> impl Iterator<Item = EntryId> + '_ {
    resume
        .experience
        .ids()
        .chain(resume.education.ids())
        .chain(resume.projects.ids())
}

pub(crate) fn portfolio_ids(portfolio: &PortfolioDocument) -> impl Iterator<Item = EntryId> + '_ {
    portfolio
        .projects
        .ids()
        .chain(portfolio.achievements.ids())
        .chain(portfolio.certifications.ids())
}
