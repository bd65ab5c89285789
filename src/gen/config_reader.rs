use crate::gen::*;

use rank_model::RawTable;

pub const DEFAULT_SUBPAGE_DIR: &str = "pages";

/// The settings of a model: the `Config:` section of the sheet, possibly
/// overridden by a JSON file.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(rename = "answerColumn", alias = "answer_column")]
    pub answer_column: Option<String>,
    #[serde(rename = "pageTitle", alias = "page_title")]
    pub page_title: Option<String>,
    #[serde(rename = "subpageDir", alias = "subpage_dir")]
    pub subpage_dir: Option<String>,
    pub ranking: Option<String>,
}

impl ModelSettings {
    /// Reads the key/value pairs of the `Config:` section. Unknown keys and
    /// empty values are ignored.
    pub fn from_table(table: &RawTable) -> GenResult<ModelSettings> {
        let mut js: JSMap<String, JSValue> = JSMap::new();
        for (key, value) in table.to_pairs() {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            js.insert(key.trim().to_string(), json!(value));
        }
        debug!("ModelSettings::from_table: {:?}", js);
        serde_json::from_value(JSValue::Object(js)).context(ParsingJsonSnafu {})
    }

    pub fn read_file(path: &str) -> BGenResult<ModelSettings> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
        let settings: ModelSettings =
            serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        info!("ModelSettings::read_file: {:?}: {:?}", path, settings);
        Ok(settings)
    }

    /// The values set in `other` replace the values of `self`.
    pub fn overridden_by(self, other: ModelSettings) -> ModelSettings {
        ModelSettings {
            answer_column: other.answer_column.or(self.answer_column),
            page_title: other.page_title.or(self.page_title),
            subpage_dir: other.subpage_dir.or(self.subpage_dir),
            ranking: other.ranking.or(self.ranking),
        }
    }

    pub fn page_title(&self) -> &str {
        self.page_title.as_deref().unwrap_or("")
    }

    pub fn subpage_dir(&self) -> &str {
        self.subpage_dir.as_deref().unwrap_or(DEFAULT_SUBPAGE_DIR)
    }

    pub fn ranking_policy(&self) -> GenResult<RankingPolicy> {
        match self.ranking.as_deref() {
            None => Ok(RankingPolicy::DEFAULT),
            Some(keyword) => {
                RankingPolicy::from_keyword(keyword).context(UnknownRankingSnafu { keyword })
            }
        }
    }
}

/// The labels displayed on the pages.
///
/// Top-level string entries translate a label. Nested objects are groups:
/// `category` holds the titles of the characteristics.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Translations {
    entries: JSMap<String, JSValue>,
}

pub const CATEGORY_GROUP: &str = "category";

impl Translations {
    pub fn read_file(path: &str) -> BGenResult<Translations> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
        let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        match js {
            JSValue::Object(entries) => {
                info!("Translations::read_file: {} entries", entries.len());
                Ok(Translations { entries })
            }
            _ => Err(Box::new(GenError::TranslationNotObject {
                path: path.to_string(),
            })),
        }
    }

    /// The translation of a label, or the label itself.
    pub fn get(&self, key: &str) -> String {
        lookup(&self.entries, key)
    }

    /// The translation of a label inside a group, or the label itself.
    pub fn get_in(&self, group: &str, key: &str) -> String {
        match self.entries.get(group) {
            Some(JSValue::Object(group_entries)) => lookup(group_entries, key),
            _ => {
                debug!("Translations::get_in: no group {:?}", group);
                key.to_string()
            }
        }
    }

    pub fn to_json(&self) -> JSValue {
        JSValue::Object(self.entries.clone())
    }
}

fn lookup(entries: &JSMap<String, JSValue>, key: &str) -> String {
    match entries.get(key) {
        Some(JSValue::String(s)) => s.clone(),
        _ => {
            info!("translation not found for {:?}", key);
            key.to_string()
        }
    }
}
