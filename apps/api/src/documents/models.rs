use std::collections::BTreeSet;
use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable identifier handed out by `DocumentStore::add_entry`.
/// Monotonically increasing per store and never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Experience,
    Education,
    ResumeProjects,
    PortfolioProjects,
    Achievements,
    Certifications,
}

impl CollectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Experience => "experience",
            CollectionKind::Education => "education",
            CollectionKind::ResumeProjects => "resume_projects",
            CollectionKind::PortfolioProjects => "portfolio_projects",
            CollectionKind::Achievements => "achievements",
            CollectionKind::Certifications => "certifications",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which root document an export/import targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    Portfolio,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::Portfolio => "portfolio",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entries
// ────────────────────────────────────────────────────────────────────────────

/// Behaviour shared by every collection item.
pub trait Entry {
    /// Typed field assignment accepted by `update_field`.
    type Field;

    fn apply(&mut self, field: Self::Field);

    /// Re-establishes entry invariants after construction or import.
    fn normalize(&mut self) {}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: String,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ExperienceField {
    Title(String),
    Company(String),
    StartDate(Option<NaiveDate>),
    EndDate(Option<NaiveDate>),
    Description(String),
    Current(bool),
}

impl Entry for ExperienceEntry {
    type Field = ExperienceField;

    fn apply(&mut self, field: ExperienceField) {
        match field {
            ExperienceField::Title(v) => self.title = v,
            ExperienceField::Company(v) => self.company = v,
            // No ordering check against end_date: stored as given.
            ExperienceField::StartDate(v) => self.start_date = v,
            ExperienceField::EndDate(v) => {
                if !self.current {
                    self.end_date = v;
                }
            }
            ExperienceField::Description(v) => self.description = v,
            ExperienceField::Current(v) => {
                self.current = v;
                self.normalize();
            }
        }
    }

    fn normalize(&mut self) {
        if self.current {
            self.end_date = None;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub grade: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum EducationField {
    Institution(String),
    Degree(String),
    FieldOfStudy(String),
    StartDate(Option<NaiveDate>),
    EndDate(Option<NaiveDate>),
    Grade(String),
}

impl Entry for EducationEntry {
    type Field = EducationField;

    fn apply(&mut self, field: EducationField) {
        match field {
            EducationField::Institution(v) => self.institution = v,
            EducationField::Degree(v) => self.degree = v,
            EducationField::FieldOfStudy(v) => self.field_of_study = v,
            EducationField::StartDate(v) => self.start_date = v,
            EducationField::EndDate(v) => self.end_date = v,
            EducationField::Grade(v) => self.grade = v,
        }
    }
}

/// Project listed on the resume itself (separate from portfolio projects).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeProject {
    pub name: String,
    pub description: String,
    pub technologies: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ResumeProjectField {
    Name(String),
    Description(String),
    Technologies(String),
    Url(String),
}

impl Entry for ResumeProject {
    type Field = ResumeProjectField;

    fn apply(&mut self, field: ResumeProjectField) {
        match field {
            ResumeProjectField::Name(v) => self.name = v,
            ResumeProjectField::Description(v) => self.description = v,
            ResumeProjectField::Technologies(v) => self.technologies = v,
            ResumeProjectField::Url(v) => self.url = v,
        }
    }
}

/// Uploaded screenshot attached to a portfolio project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectImage {
    pub file_name: String,
    pub content_type: String,
    #[serde(serialize_with = "to_base64", deserialize_with = "from_base64")]
    pub data: Vec<u8>,
}

fn to_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}

fn from_base64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    STANDARD
        .decode(encoded.as_bytes())
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub title: String,
    pub description: String,
    /// Free text, comma-separated as typed by the user.
    pub technologies: String,
    pub github_url: String,
    pub live_url: String,
    pub image: Option<ProjectImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ProjectField {
    Title(String),
    Description(String),
    Technologies(String),
    GithubUrl(String),
    LiveUrl(String),
    Image(Option<ProjectImage>),
}

impl Entry for ProjectEntry {
    type Field = ProjectField;

    fn apply(&mut self, field: ProjectField) {
        match field {
            ProjectField::Title(v) => self.title = v,
            ProjectField::Description(v) => self.description = v,
            ProjectField::Technologies(v) => self.technologies = v,
            ProjectField::GithubUrl(v) => self.github_url = v,
            ProjectField::LiveUrl(v) => self.live_url = v,
            ProjectField::Image(v) => self.image = v,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Achievement {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum AchievementField {
    Text(String),
}

impl Entry for Achievement {
    type Field = AchievementField;

    fn apply(&mut self, field: AchievementField) {
        match field {
            AchievementField::Text(v) => self.text = v,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationEntry {
    pub name: String,
    pub issuer: String,
    pub date_issued: Option<NaiveDate>,
    pub credential_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum CertificationField {
    Name(String),
    Issuer(String),
    DateIssued(Option<NaiveDate>),
    CredentialId(String),
}

impl Entry for CertificationEntry {
    type Field = CertificationField;

    fn apply(&mut self, field: CertificationField) {
        match field {
            CertificationField::Name(v) => self.name = v,
            CertificationField::Issuer(v) => self.issuer = v,
            CertificationField::DateIssued(v) => self.date_issued = v,
            CertificationField::CredentialId(v) => self.credential_id = v,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Collections
// ────────────────────────────────────────────────────────────────────────────

/// An entry together with its stable id. Exported as `{ "id": n, ...fields }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: EntryId,
    #[serde(flatten)]
    pub entry: T,
}

/// Ordered collection keyed by `EntryId`. Positions are never used for lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<T> {
    items: Vec<Stored<T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entry> Collection<T> {
    pub(crate) fn push(&mut self, id: EntryId, mut entry: T) {
        entry.normalize();
        self.items.push(Stored { id, entry });
    }

    /// Returns false when `id` is not present.
    pub(crate) fn update(&mut self, id: EntryId, field: T::Field) -> bool {
        match self.items.iter_mut().find(|s| s.id == id) {
            Some(stored) => {
                stored.entry.apply(field);
                true
            }
            None => false,
        }
    }

    /// Returns false when `id` was already absent.
    pub(crate) fn remove(&mut self, id: EntryId) -> bool {
        let before = self.items.len();
        self.items.retain(|s| s.id != id);
        self.items.len() != before
    }

    pub(crate) fn normalize_all(&mut self) {
        for stored in &mut self.items {
            stored.entry.normalize();
        }
    }
}

impl<T> Collection<T> {
    pub fn get(&self, id: EntryId) -> Option<&T> {
        self.items.iter().find(|s| s.id == id).map(|s| &s.entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stored<T>> {
        self.items.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.items.iter().map(|s| s.id)
    }

    /// Gives every entry a new id from `allocate`, keeping order.
    pub(crate) fn reassign_ids(&mut self, mut allocate: impl FnMut() -> EntryId) {
        for stored in &mut self.items {
            stored.id = allocate();
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Root documents
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

impl PersonalInfo {
    /// Overwrites every key present in `patch`; absent keys are left alone.
    pub fn merge(&mut self, patch: PersonalInfo) {
        let PersonalInfo {
            name,
            email,
            phone,
            location,
            linkedin,
            github,
        } = patch;
        for (slot, value) in [
            (&mut self.name, name),
            (&mut self.email, email),
            (&mut self.phone, phone),
            (&mut self.location, location),
            (&mut self.linkedin, linkedin),
            (&mut self.github, github),
        ] {
            if value.is_some() {
                *slot = value;
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub summary: Option<String>,
    pub experience: Collection<ExperienceEntry>,
    pub education: Collection<EducationEntry>,
    /// Sorted so exports are deterministic.
    pub skills: BTreeSet<String>,
    pub projects: Collection<ResumeProject>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioDocument {
    pub projects: Collection<ProjectEntry>,
    pub achievements: Collection<Achievement>,
    pub certifications: Collection<CertificationEntry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Collection-tagged payloads
// ────────────────────────────────────────────────────────────────────────────

/// Defaults for a new entry; the variant picks the collection.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryData {
    Experience(ExperienceEntry),
    Education(EducationEntry),
    ResumeProject(ResumeProject),
    PortfolioProject(ProjectEntry),
    Achievement(Achievement),
    Certification(CertificationEntry),
}

impl EntryData {
    pub fn kind(&self) -> CollectionKind {
        match self {
            EntryData::Experience(_) => CollectionKind::Experience,
            EntryData::Education(_) => CollectionKind::Education,
            EntryData::ResumeProject(_) => CollectionKind::ResumeProjects,
            EntryData::PortfolioProject(_) => CollectionKind::PortfolioProjects,
            EntryData::Achievement(_) => CollectionKind::Achievements,
            EntryData::Certification(_) => CollectionKind::Certifications,
        }
    }

    /// Decodes a JSON body into the entry type of `kind`. Missing fields default.
    pub fn from_json(kind: CollectionKind, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            CollectionKind::Experience => EntryData::Experience(serde_json::from_value(value)?),
            CollectionKind::Education => EntryData::Education(serde_json::from_value(value)?),
            CollectionKind::ResumeProjects => {
                EntryData::ResumeProject(serde_json::from_value(value)?)
            }
            CollectionKind::PortfolioProjects => {
                EntryData::PortfolioProject(serde_json::from_value(value)?)
            }
            CollectionKind::Achievements => EntryData::Achievement(serde_json::from_value(value)?),
            CollectionKind::Certifications => {
                EntryData::Certification(serde_json::from_value(value)?)
            }
        })
    }
}

/// A single field assignment; the variant picks the collection.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Experience(ExperienceField),
    Education(EducationField),
    ResumeProject(ResumeProjectField),
    PortfolioProject(ProjectField),
    Achievement(AchievementField),
    Certification(CertificationField),
}

impl FieldUpdate {
    pub fn kind(&self) -> CollectionKind {
        match self {
            FieldUpdate::Experience(_) => CollectionKind::Experience,
            FieldUpdate::Education(_) => CollectionKind::Education,
            FieldUpdate::ResumeProject(_) => CollectionKind::ResumeProjects,
            FieldUpdate::PortfolioProject(_) => CollectionKind::PortfolioProjects,
            FieldUpdate::Achievement(_) => CollectionKind::Achievements,
            FieldUpdate::Certification(_) => CollectionKind::Certifications,
        }
    }

    /// Decodes `{ "field": "...", "value": ... }` for the given collection.
    pub fn from_json(kind: CollectionKind, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            CollectionKind::Experience => FieldUpdate::Experience(serde_json::from_value(value)?),
            CollectionKind::Education => FieldUpdate::Education(serde_json::from_value(value)?),
            CollectionKind::ResumeProjects => {
                FieldUpdate::ResumeProject(serde_json::from_value(value)?)
            }
            CollectionKind::PortfolioProjects => {
                FieldUpdate::PortfolioProject(serde_json::from_value(value)?)
            }
            CollectionKind::Achievements => {
                FieldUpdate::Achievement(serde_json::from_value(value)?)
            }
            CollectionKind::Certifications => {
                FieldUpdate::Certification(serde_json::from_value(value)?)
            }
        })
    }

    /// Builds an update that writes `text` into the named text field.
    pub fn text(kind: CollectionKind, field: &str, text: String) -> serde_json::Result<Self> {
        Self::from_json(kind, serde_json::json!({ "field": field, "value": text }))
    }
}
