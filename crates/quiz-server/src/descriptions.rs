//! Static per-category tendency descriptions.
//!
//! Immutable lookup data built once at startup and passed into the scoring
//! engine by reference. Lookup never fails; a missing (category, tendency)
//! pair yields the placeholder text.

use std::collections::HashMap;

use crate::model::Tendency;

/// Shown when no description exists for a (category, tendency) pair.
pub const PENDING_DESCRIPTION: &str = "분석 중";

pub struct DescriptionTable {
    entries: HashMap<(String, Tendency), &'static str>,
}

impl DescriptionTable {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, category: &str, tendency: Tendency, text: &'static str) {
        self.entries.insert((category.to_string(), tendency), text);
    }

    /// Description for a (category, tendency) pair, falling back to the
    /// placeholder when no entry exists.
    pub fn lookup(&self, category: &str, tendency: Tendency) -> &'static str {
        self.entries
            .get(&(category.to_string(), tendency))
            .copied()
            .unwrap_or(PENDING_DESCRIPTION)
    }

    /// The production table for the six standard categories.
    pub fn standard() -> Self {
        let mut table = Self::new();
        let mut fill = |category: &str, texts: [&'static str; 5]| {
            for (tendency, text) in Tendency::ALL.into_iter().zip(texts) {
                table.insert(category, tendency, text);
            }
        };

        fill(
            "경제 / 복지",
            [
                "복지 확대와 경제적 평등을 중시",
                "복지와 시장경제의 균형을 추구",
                "복지와 경제 성장의 균형을 추구",
                "시장 경제 우선하되 필요한 복지 인정",
                "시장 경제와 개인 책임을 강조",
            ],
        );
        fill(
            "안보 / 외교",
            [
                "대화와 협력을 통한 평화 추구",
                "대화 우선하되 현실적 안보 고려",
                "대화와 견제의 균형잡힌 접근",
                "안보 우선하되 대화 가능성 열어둠",
                "강경한 안보 정책과 동맹 강화",
            ],
        );
        fill(
            "사회 / 젠더",
            [
                "다양성과 포용을 적극 지지",
                "다양성 지지하되 점진적 변화 선호",
                "다양성과 전통의 균형 추구",
                "전통 가치 우선하되 다양성 부분 인정",
                "전통적 가치와 질서를 중시",
            ],
        );
        fill(
            "교육 / 세대",
            [
                "교육 평등과 기회 균등을 중시",
                "평등과 능력주의의 조화 추구",
                "공정성과 다양성의 균형 추구",
                "능력주의 우선하되 기회 평등 고려",
                "능력과 노력에 따른 차별화 지지",
            ],
        );
        fill(
            "시장 / 대기업",
            [
                "대기업 규제와 중소기업 보호 중시",
                "규제와 시장 효율의 균형 추구",
                "시장 원리와 규제의 조화 추구",
                "시장 자유 우선하되 필요한 규제 인정",
                "자유시장과 기업 활동의 자율성 중시",
            ],
        );
        fill(
            "환경 / 기후",
            [
                "환경 보호를 최우선으로 고려",
                "환경 보호와 경제의 조화 추구",
                "환경 보호와 경제성 모두 고려",
                "경제성 우선하되 환경 문제 인식",
                "경제 성장과 현실적 에너지 정책 중시",
            ],
        );

        table
    }
}

impl Default for DescriptionTable {
    fn default() -> Self {
        Self::new()
    }
}
