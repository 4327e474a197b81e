use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};

/// One of the twelve forced-choice statements.
///
/// Weights are signed: more negative = more progressive, more positive = more
/// conservative. Nothing guarantees `left_weight < right_weight`; scoring
/// takes the per-question min/max when computing normalization bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique positive id, stable across releases (answers reference it).
    pub id: u32,
    /// Grouping tag; two questions share each category.
    pub category: String,
    pub category_icon: String,
    /// Statement shown for the left (progressive-leaning) option.
    pub left: String,
    /// Statement shown for the right (conservative-leaning) option.
    pub right: String,
    #[serde(rename = "leftScore")]
    pub left_weight: i32,
    #[serde(rename = "rightScore")]
    pub right_weight: i32,
}

impl Question {
    /// Smallest score this question can contribute.
    pub fn min_weight(&self) -> i32 {
        self.left_weight.min(self.right_weight)
    }

    /// Largest score this question can contribute.
    pub fn max_weight(&self) -> i32 {
        self.left_weight.max(self.right_weight)
    }
}

/// Which side of a question the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Left,
    Right,
}

/// A single submitted answer.
///
/// Carries a denormalized copy of the question's weights as captured by the
/// client at answer time. Scoring treats the catalog's weights as
/// authoritative, so stale copies cannot skew the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: u32,
    pub choice: Choice,
    #[serde(rename = "leftScore")]
    pub left_weight: i32,
    #[serde(rename = "rightScore")]
    pub right_weight: i32,
}

impl Answer {
    /// The denormalized weight of the chosen side (used for prompt context,
    /// not for scoring).
    pub fn chosen_weight(&self) -> i32 {
        match self.choice {
            Choice::Left => self.left_weight,
            Choice::Right => self.right_weight,
        }
    }
}

/// Optional self-reported demographics. Each field is absent or one of an
/// enumerated set; the client sends an empty string for "prefer not to say".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Demographics {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub age: Option<AgeBracket>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub region: Option<Region>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBracket {
    #[serde(rename = "10s")]
    Teens,
    #[serde(rename = "20s")]
    Twenties,
    #[serde(rename = "30s")]
    Thirties,
    #[serde(rename = "40s")]
    Forties,
    #[serde(rename = "50s")]
    Fifties,
    #[serde(rename = "60s")]
    SixtiesPlus,
}

impl AgeBracket {
    pub fn korean(&self) -> &'static str {
        match self {
            AgeBracket::Teens => "10대",
            AgeBracket::Twenties => "20대",
            AgeBracket::Thirties => "30대",
            AgeBracket::Forties => "40대",
            AgeBracket::Fifties => "50대",
            AgeBracket::SixtiesPlus => "60대 이상",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn korean(&self) -> &'static str {
        match self {
            Gender::Male => "남성",
            Gender::Female => "여성",
            Gender::Other => "기타",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Seoul,
    Busan,
    Daegu,
    Incheon,
    Gwangju,
    Daejeon,
    Ulsan,
    Gyeonggi,
    Other,
}

impl Region {
    pub fn korean(&self) -> &'static str {
        match self {
            Region::Seoul => "서울",
            Region::Busan => "부산",
            Region::Daegu => "대구",
            Region::Incheon => "인천",
            Region::Gwangju => "광주",
            Region::Daejeon => "대전",
            Region::Ulsan => "울산",
            Region::Gyeonggi => "경기",
            Region::Other => "기타",
        }
    }
}

/// Five-bucket orientation label, ordered progressive to conservative.
/// Assigned by fixed score thresholds, identically for the overall score and
/// every category sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tendency {
    Progressive,
    CenterProgressive,
    Center,
    CenterConservative,
    Conservative,
}

impl Tendency {
    pub const ALL: [Tendency; 5] = [
        Tendency::Progressive,
        Tendency::CenterProgressive,
        Tendency::Center,
        Tendency::CenterConservative,
        Tendency::Conservative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tendency::Progressive => "progressive",
            Tendency::CenterProgressive => "center-progressive",
            Tendency::Center => "center",
            Tendency::CenterConservative => "center-conservative",
            Tendency::Conservative => "conservative",
        }
    }

    /// Korean display form, used in prompts and canned narrative text.
    pub fn korean(&self) -> &'static str {
        match self {
            Tendency::Progressive => "진보",
            Tendency::CenterProgressive => "중도-진보",
            Tendency::Center => "중도",
            Tendency::CenterConservative => "중도-보수",
            Tendency::Conservative => "보수",
        }
    }
}

impl std::fmt::Display for Tendency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category result: normalized 0-100 sub-score, its tendency bucket, and
/// the static description for that (category, tendency) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub name: String,
    pub score: u8,
    pub tendency: Tendency,
    pub description: String,
}

/// The full, immutable record of one completed quiz submission.
/// Created once, retrieved by session id, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub session_id: String,
    pub political_score: u8,
    pub political_label: Tendency,
    pub ai_analysis: String,
    /// Keyed by category name, in catalog order.
    pub category_scores: IndexMap<String, CategoryScore>,
    pub answers: Vec<Answer>,
    pub demographics: Option<Demographics>,
    pub created_at: DateTime<Utc>,
}

/// Deserialize an optional enum field, treating an empty string as absent.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => T::deserialize(s.into_deserializer()).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_uses_lowercase_wire_values() {
        assert_eq!(serde_json::to_string(&Choice::Left).unwrap(), "\"left\"");
        let c: Choice = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(c, Choice::Right);
    }

    #[test]
    fn answer_round_trips_original_wire_shape() {
        let json = r#"{"questionId":3,"choice":"left","leftScore":-2,"rightScore":2}"#;
        let a: Answer = serde_json::from_str(json).unwrap();
        assert_eq!(a.question_id, 3);
        assert_eq!(a.choice, Choice::Left);
        assert_eq!(a.chosen_weight(), -2);
        assert_eq!(serde_json::to_string(&a).unwrap(), json);
    }

    #[test]
    fn tendency_wire_labels() {
        assert_eq!(
            serde_json::to_string(&Tendency::CenterProgressive).unwrap(),
            "\"center-progressive\""
        );
        assert_eq!(Tendency::Conservative.to_string(), "conservative");
        assert_eq!(Tendency::Progressive.korean(), "진보");
    }

    #[test]
    fn demographics_accepts_empty_strings_as_absent() {
        let json = r#"{"age":"","gender":"male","region":""}"#;
        let d: Demographics = serde_json::from_str(json).unwrap();
        assert_eq!(d.age, None);
        assert_eq!(d.gender, Some(Gender::Male));
        assert_eq!(d.region, None);
    }

    #[test]
    fn demographics_rejects_unknown_values() {
        let json = r#"{"age":"90s"}"#;
        assert!(serde_json::from_str::<Demographics>(json).is_err());
    }

    #[test]
    fn demographics_fields_default_to_absent() {
        let d: Demographics = serde_json::from_str("{}").unwrap();
        assert!(d.age.is_none() && d.gender.is_none() && d.region.is_none());
    }
}
