//! The fixed question catalog.
//!
//! Twelve forced-choice statements across six categories, two per category.
//! The catalog is immutable reference data: the scoring engine reads it,
//! nothing mutates it. Category grouping is precomputed once at construction
//! so per-request scoring never rescans the full question list.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::model::Question;

pub struct QuestionCatalog {
    questions: Vec<Question>,
    by_id: HashMap<u32, usize>,
    /// Category name -> ids of its questions, in first-appearance order.
    categories: IndexMap<String, Vec<u32>>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<Question>) -> Self {
        let mut by_id = HashMap::with_capacity(questions.len());
        let mut categories: IndexMap<String, Vec<u32>> = IndexMap::new();
        for (idx, q) in questions.iter().enumerate() {
            by_id.insert(q.id, idx);
            categories.entry(q.category.clone()).or_default().push(q.id);
        }
        Self {
            questions,
            by_id,
            categories,
        }
    }

    /// The full ordered question list.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: u32) -> Option<&Question> {
        self.by_id.get(&id).map(|&idx| &self.questions[idx])
    }

    pub fn contains(&self, id: u32) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Distinct category names in catalog order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Questions belonging to a category, in catalog order.
    pub fn category_questions(&self, name: &str) -> impl Iterator<Item = &Question> {
        self.categories
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.question(*id))
    }

    /// (category name, question ids) pairs, in catalog order.
    pub fn category_index(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.categories
            .iter()
            .map(|(name, ids)| (name.as_str(), ids.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The production 12-question catalog.
    pub fn standard() -> Self {
        Self::new(vec![
            // 경제/복지
            question(
                1,
                "경제 / 복지",
                "💰",
                "국가는 복지를 확대해 사회적 안전망을 강화해야 한다",
                "복지는 최소한으로 하고, 개인의 책임과 자율에 맡겨야 한다",
                -2,
                2,
            ),
            question(
                2,
                "경제 / 복지",
                "💰",
                "최저임금은 생활 가능한 수준으로 올려야 한다",
                "최저임금은 시장 논리에 맡기는 것이 바람직하다",
                -2,
                2,
            ),
            // 안보/외교
            question(
                3,
                "안보 / 외교",
                "🛡️",
                "북한과의 대화와 협력이 평화를 가져온다",
                "북한에 대한 강경한 자세가 더 효과적이다",
                -2,
                2,
            ),
            question(
                4,
                "안보 / 외교",
                "🛡️",
                "한미동맹보다 자주국방이 더 중요하다",
                "한미동맹은 안보의 핵심이므로 더욱 강화해야 한다",
                -1,
                2,
            ),
            // 사회/젠더
            question(
                5,
                "사회 / 젠더",
                "👥",
                "페미니즘은 여전히 한국 사회에 꼭 필요한 운동이다",
                "페미니즘은 이제 남성에 대한 역차별로 작용하고 있다",
                -2,
                2,
            ),
            question(
                6,
                "사회 / 젠더",
                "👥",
                "퀴어 퍼레이드는 다양성을 존중하는 표현이다",
                "불쾌감을 줄 수 있는 행사는 제한되어야 한다",
                -2,
                2,
            ),
            // 교육/세대
            question(
                7,
                "교육 / 세대",
                "📚",
                "교육은 모두에게 평등한 기회를 제공해야 한다",
                "능력과 노력에 따라 차별화된 교육 기회를 제공해야 한다",
                -1,
                1,
            ),
            question(
                8,
                "교육 / 세대",
                "📚",
                "수시 제도는 다양한 능력을 반영하는 좋은 제도다",
                "정시 확대가 공정하고 투명한 방법이다",
                -1,
                1,
            ),
            // 시장/대기업
            question(
                9,
                "시장 / 대기업",
                "🏢",
                "대기업에 대한 규제를 강화해 중소기업을 보호해야 한다",
                "대기업의 자유로운 활동이 경제 전반에 더 도움이 된다",
                -2,
                2,
            ),
            question(
                10,
                "시장 / 대기업",
                "🏢",
                "부동산 시장은 정부가 적극 개입해 가격을 안정시켜야 한다",
                "부동산은 시장 원리에 따라 움직이게 해야 한다",
                -2,
                2,
            ),
            // 환경/기후
            question(
                11,
                "환경 / 기후",
                "🌍",
                "환경 보호를 위해 세금을 늘리는 것도 감수할 수 있다",
                "경제 성장을 위해 환경 규제는 최소화되어야 한다",
                -2,
                2,
            ),
            question(
                12,
                "환경 / 기후",
                "🌍",
                "탈핵과 재생에너지 확대가 필요하다",
                "원전은 안정적인 에너지원이므로 유지 또는 확대해야 한다",
                -1,
                1,
            ),
        ])
    }
}

fn question(
    id: u32,
    category: &str,
    icon: &str,
    left: &str,
    right: &str,
    left_weight: i32,
    right_weight: i32,
) -> Question {
    Question {
        id,
        category: category.to_string(),
        category_icon: icon.to_string(),
        left: left.to_string(),
        right: right.to_string(),
        left_weight,
        right_weight,
    }
}
