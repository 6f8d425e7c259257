//! Label bundle resolution.
//!
//! The site's UI strings and localized route segments come from a language
//! pack chosen by `site.lang`. Resolution has two fallback edges, both landing
//! on English:
//!
//! ```text
//! lang == "custom" && i18n_file ──load──▶ custom pack ──fail──▶ en + warning
//! otherwise ─────────────────────load──▶ pack for lang ──fail──▶ en + warning
//! ```
//!
//! `i18n_overrides.labels` are then merged over the chosen pack, and every key
//! of the English pack that is still missing is filled with the key itself
//! (with a warning). The bundle therefore always covers the full English key
//! set, so templates never hit a missing label.
//!
//! Packs come from a [`PackSource`]. [`BuiltinPacks`] carries the packs that
//! ship with the binary; [`DirectoryPacks`] lets a site add or replace packs
//! from a directory of `<code>.yml` files.

use crate::source::{self, Format};
use crate::warning::Warning;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// The reference locale every bundle is completed against.
pub const REFERENCE_LOCALE: &str = "en";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// A language pack as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LanguagePack {
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub dir: TextDirection,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl LanguagePack {
    /// Parse a YAML pack. `None` when the text is not a pack.
    pub fn parse(text: &str) -> Option<Self> {
        let value = source::parse_value(text, Format::Yaml).ok()?;
        serde_json::from_value(value).ok()
    }

    fn empty_reference() -> Self {
        Self {
            locale: Some(REFERENCE_LOCALE.to_string()),
            ..Self::default()
        }
    }
}

/// Where language packs come from.
pub trait PackSource {
    /// The pack for a language code, if there is one.
    fn pack(&self, lang: &str) -> Option<LanguagePack>;

    /// A pack stored at an arbitrary path, for `lang: custom`.
    fn pack_file(&self, path: &Path) -> Option<LanguagePack> {
        fs::read_to_string(path)
            .ok()
            .and_then(|text| LanguagePack::parse(&text))
    }
}

/// Packs compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinPacks;

impl BuiltinPacks {
    pub const CODES: [&'static str; 5] = ["en", "fr", "es", "de", "ar"];

    fn text(lang: &str) -> Option<&'static str> {
        match lang {
            "en" => Some(include_str!("../i18n/en.yml")),
            "fr" => Some(include_str!("../i18n/fr.yml")),
            "es" => Some(include_str!("../i18n/es.yml")),
            "de" => Some(include_str!("../i18n/de.yml")),
            "ar" => Some(include_str!("../i18n/ar.yml")),
            _ => None,
        }
    }
}

impl PackSource for BuiltinPacks {
    fn pack(&self, lang: &str) -> Option<LanguagePack> {
        Self::text(lang).and_then(LanguagePack::parse)
    }
}

/// Packs read from `<dir>/<code>.yml`, falling back to the built-in packs for
/// codes the directory does not provide.
#[derive(Debug, Clone)]
pub struct DirectoryPacks {
    dir: PathBuf,
}

impl DirectoryPacks {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PackSource for DirectoryPacks {
    fn pack(&self, lang: &str) -> Option<LanguagePack> {
        // Codes become file names; refuse anything that could leave the dir.
        if lang.is_empty() || lang.contains(['/', '\\', '.']) {
            return BuiltinPacks.pack(lang);
        }
        self.pack_file(&self.dir.join(format!("{lang}.yml")))
            .or_else(|| BuiltinPacks.pack(lang))
    }
}

/// What to resolve.
#[derive(Debug, Clone, Default)]
pub struct I18nRequest<'a> {
    pub lang: &'a str,
    pub overrides: Option<&'a BTreeMap<String, String>>,
    /// Pack file used when `lang` is `custom`.
    pub custom_file: Option<&'a Path>,
}

/// The resolved labels for one build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct I18nBundle {
    pub locale: String,
    pub dir: TextDirection,
    pub labels: BTreeMap<String, String>,
}

impl I18nBundle {
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// A label, or `default` when the bundle has none.
    pub fn label_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.label(key).filter(|l| !l.is_empty()).unwrap_or(default)
    }
}

/// Resolve the label bundle for a build.
pub fn resolve_i18n(
    request: &I18nRequest<'_>,
    packs: &dyn PackSource,
) -> (I18nBundle, Vec<Warning>) {
    let mut warnings = Vec::new();
    let english = || {
        packs
            .pack(REFERENCE_LOCALE)
            .unwrap_or_else(LanguagePack::empty_reference)
    };

    let (base, base_lang) = match request.custom_file {
        Some(path) if request.lang == "custom" => match packs.pack_file(path) {
            Some(pack) => (pack, request.lang),
            None => {
                warnings.push(Warning::CustomLocaleFallback {
                    path: path.to_path_buf(),
                });
                (english(), REFERENCE_LOCALE)
            }
        },
        _ => match packs.pack(request.lang) {
            Some(pack) => (pack, request.lang),
            None => {
                warnings.push(Warning::LocaleFallback {
                    lang: request.lang.to_string(),
                });
                (english(), REFERENCE_LOCALE)
            }
        },
    };

    let reference = if base_lang == REFERENCE_LOCALE {
        base.labels.clone()
    } else {
        english().labels
    };

    let mut labels = base.labels;
    if let Some(overrides) = request.overrides {
        labels.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    for key in reference.keys() {
        if !labels.contains_key(key) {
            warnings.push(Warning::MissingLabel { key: key.clone() });
            labels.insert(key.clone(), key.clone());
        }
    }

    let bundle = I18nBundle {
        locale: base.locale.unwrap_or_else(|| base_lang.to_string()),
        dir: base.dir,
        labels,
    };
    tracing::debug!(locale = %bundle.locale, labels = bundle.labels.len(), "resolved i18n");
    (bundle, warnings)
}
