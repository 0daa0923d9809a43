use std::{fmt, num::NonZeroUsize, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::{
    Handle, NumberingScheme, RecordId, handle::InvalidHandleError, scheme::UnknownSchemeError,
};

/// Largest generation depth a report may request.
pub const MAX_GENERATIONS: usize = 100;

const DEFAULT_GENERATIONS: usize = 10;

/// How people are organised in the report.
///
/// Only one structure exists today; the option is still validated so that
/// option files written for other structures fail loudly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportStructure {
    /// One section per generation.
    #[default]
    ByGeneration,
}

impl ReportStructure {
    const fn name(self) -> &'static str {
        match self {
            Self::ByGeneration => "by generation",
        }
    }
}

impl fmt::Display for ReportStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportStructure {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "by generation" => Ok(Self::ByGeneration),
            _ => Err(OptionsError::UnknownStructure(s.to_string())),
        }
    }
}

/// How person names are arranged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NameFormat {
    /// `John Smith Jr`
    #[default]
    GivenSurname,
    /// `Smith, John Jr`
    SurnameGiven,
    /// `SMITH, John Jr`
    UpperSurnameGiven,
    /// `John`
    Given,
}

/// How much of a place hierarchy is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PlaceFormat {
    /// The place and every enclosing place, innermost first.
    #[default]
    Full,
    /// Only the place's own name.
    Name,
}

/// How dates are written in the details lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DateFormat {
    /// Year only, e.g. `abt 1900`. Keeps entries compact.
    #[default]
    Year,
    /// `1900-03-12`
    Iso,
    /// `12 March 1900`
    Long,
}

/// How people who may still be alive are presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LivingPeople {
    /// Show everything.
    #[default]
    IncludeAll,
    /// Show the full name but no vital details.
    FullNameOnly,
    /// Show the surname only, with no vital details.
    LastNameOnly,
    /// Replace the name with `Living` and hide details.
    ReplaceName,
}

/// Options controlling a descendant report.
///
/// Stored on disk as TOML, using the option keys of the report menu (`gen`,
/// `pagebbg`, `listc`, `numbering`, `pid`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Versions", into = "Versions")]
pub struct ReportOptions {
    /// Maximum number of generations to include.
    max_generations: NonZeroUsize,

    /// Whether to start a new page after each generation.
    pub page_break_between_generations: bool,

    /// Whether to list each family's children in a table.
    pub list_children: bool,

    /// The numbering system to use.
    pub numbering: NumberingScheme,

    /// External id of the centre person.
    pub center_person: Option<RecordId>,

    /// Whether to show birth and death details.
    pub lifespan: bool,

    /// How people are organised.
    pub structure: ReportStructure,

    /// How names are displayed.
    pub name_format: NameFormat,

    /// How places are displayed.
    pub place_format: PlaceFormat,

    /// How dates are displayed.
    pub date_format: DateFormat,

    /// Whether records marked private are shown.
    pub include_private: bool,

    /// How possibly living people are presented.
    pub living_people: LivingPeople,

    /// Treat people as living for this many years after their death.
    pub years_past_death: u32,

    /// Language of the report text.
    pub locale: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            max_generations: default_generations(),
            page_break_between_generations: false,
            list_children: true,
            numbering: NumberingScheme::default(),
            center_person: None,
            lifespan: true,
            structure: ReportStructure::default(),
            name_format: NameFormat::default(),
            place_format: PlaceFormat::default(),
            date_format: DateFormat::default(),
            include_private: true,
            living_people: LivingPeople::default(),
            years_past_death: 0,
            locale: default_locale(),
        }
    }
}

impl ReportOptions {
    /// Loads options from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is invalid, or an
    /// option has an unrecognised value.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read options file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse options file: {e}"))
    }

    /// Saves the options to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the options cannot be serialized or the file cannot
    /// be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize options: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write options file: {e}"))
    }

    /// Maximum number of generations to include.
    #[must_use]
    pub const fn max_generations(&self) -> NonZeroUsize {
        self.max_generations
    }

    /// Sets the generation depth.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::Generations`] unless `1 <= generations <= 100`.
    pub fn set_max_generations(&mut self, generations: usize) -> Result<(), OptionsError> {
        self.max_generations = validate_generations(generations)?;
        Ok(())
    }
}

/// Errors raised while interpreting report options.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OptionsError {
    /// The numbering option names no known scheme.
    #[error(transparent)]
    UnknownScheme(#[from] UnknownSchemeError),

    /// The structure option names no known report structure.
    #[error("no such report structure: '{0}' (expected 'by generation')")]
    UnknownStructure(String),

    /// The generation depth is out of range.
    #[error("generations must be between 1 and {MAX_GENERATIONS}, got {0}")]
    Generations(usize),

    /// The centre person id is not a valid record id.
    #[error(transparent)]
    PersonId(#[from] InvalidHandleError),
}

fn validate_generations(generations: usize) -> Result<NonZeroUsize, OptionsError> {
    NonZeroUsize::new(generations)
        .filter(|g| g.get() <= MAX_GENERATIONS)
        .ok_or(OptionsError::Generations(generations))
}

fn default_generations() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_GENERATIONS).unwrap_or(NonZeroUsize::MIN)
}

const fn default_gen_value() -> usize {
    DEFAULT_GENERATIONS
}

const fn default_true() -> bool {
    true
}

fn default_numbering() -> String {
    NumberingScheme::default().name().to_string()
}

fn default_structure() -> String {
    ReportStructure::default().name().to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

/// The serialized versions of the options.
/// This allows the on-disk format to evolve independently of the domain type.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_gen_value")]
        r#gen: usize,

        #[serde(default)]
        pagebbg: bool,

        #[serde(default = "default_true")]
        listc: bool,

        #[serde(default = "default_numbering")]
        numbering: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        pid: Option<String>,

        #[serde(default = "default_true")]
        lifespan: bool,

        #[serde(default = "default_structure")]
        structure: String,

        #[serde(default)]
        name_format: NameFormat,

        #[serde(default)]
        place_format: PlaceFormat,

        #[serde(default)]
        date_format: DateFormat,

        #[serde(default = "default_true")]
        incl_private: bool,

        #[serde(default)]
        living_people: LivingPeople,

        #[serde(default)]
        years_past_death: u32,

        #[serde(default = "default_locale")]
        trans: String,
    },
}

impl TryFrom<Versions> for ReportOptions {
    type Error = OptionsError;

    fn try_from(versions: Versions) -> Result<Self, Self::Error> {
        match versions {
            Versions::V1 {
                r#gen,
                pagebbg,
                listc,
                numbering,
                pid,
                lifespan,
                structure,
                name_format,
                place_format,
                date_format,
                incl_private,
                living_people,
                years_past_death,
                trans,
            } => Ok(Self {
                max_generations: validate_generations(r#gen)?,
                page_break_between_generations: pagebbg,
                list_children: listc,
                numbering: numbering.parse()?,
                center_person: pid.map(Handle::new).transpose()?,
                lifespan,
                structure: structure.parse()?,
                name_format,
                place_format,
                date_format,
                include_private: incl_private,
                living_people,
                years_past_death,
                locale: trans,
            }),
        }
    }
}

impl From<ReportOptions> for Versions {
    fn from(options: ReportOptions) -> Self {
        Self::V1 {
            r#gen: options.max_generations.get(),
            pagebbg: options.page_break_between_generations,
            listc: options.list_children,
            numbering: options.numbering.name().to_string(),
            pid: options.center_person.map(String::from),
            lifespan: options.lifespan,
            structure: options.structure.name().to_string(),
            name_format: options.name_format,
            place_format: options.place_format,
            date_format: options.date_format,
            incl_private: options.include_private,
            living_people: options.living_people,
            years_past_death: options.years_past_death,
            trans: options.locale,
        }
    }
}
