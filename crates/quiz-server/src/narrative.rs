//! AI narrative generation.
//!
//! Builds the Korean analysis prompts from the engine's output, calls Gemini,
//! and falls back to canned per-label paragraphs on any failure (no API key,
//! upstream error after retries, empty candidate, rate limited). A submission
//! never fails because the narrative could not be generated.

use indexmap::IndexMap;
use tracing::warn;

use quiz_common::gemini::{Content, GenerateContentRequest, GenerationConfig, GeminiClient};

use crate::model::{Answer, CategoryScore, Choice, Demographics, Tendency};
use crate::rate_limit::RateLimiter;

const SYSTEM_PROMPT: &str = "당신은 한국 정치 성향을 분석하는 전문가입니다.
사용자의 밸런스 게임 응답을 바탕으로 정치적 성향을 분석하고, 한국어로 상세하고 개인화된 해석을 제공해주세요.

분석 기준:
- 진보(-2~-1점): 복지 확대, 사회적 평등, 환경 보호, 대화 외교 선호
- 중도(-1~1점): 균형잡힌 접근, 실용적 정책 선호
- 보수(1~2점): 시장 경제, 개인 책임, 전통 가치, 강한 안보 선호

분석 결과는 다음 요소를 포함해야 합니다:
1. 전반적인 정치 성향 특징 (2-3문장)
2. 주요 분야별 성향 분석 (경제, 사회, 안보 등)
3. 해당 성향의 특징과 가치관
4. 정치적 의사결정 패턴

한국 사회의 맥락을 고려하여 분석하고, 편견없이 균형잡힌 시각으로 작성해주세요.
분석은 3-4개 문단으로 구성하고, 각 문단은 2-3문장으로 작성해주세요.";

pub struct NarrativeService {
    client: GeminiClient,
    limiter: Option<RateLimiter>,
}

impl NarrativeService {
    pub fn new(client: GeminiClient, limiter: Option<RateLimiter>) -> Self {
        Self { client, limiter }
    }

    /// Produce the prose interpretation for a completed submission.
    /// Infallible by contract: any generation failure yields the canned
    /// narrative for the overall label.
    pub async fn analyze(
        &self,
        answers: &[Answer],
        demographics: Option<&Demographics>,
        score: u8,
        label: Tendency,
        category_scores: &IndexMap<String, CategoryScore>,
    ) -> String {
        let prompt = build_user_prompt(answers, demographics, score, label, category_scores);
        match self.try_generate(prompt).await {
            Ok(text) => text,
            Err(reason) => {
                warn!(reason = %reason, label = %label, "narrative generation failed, using canned analysis");
                fallback_analysis(label).to_string()
            }
        }
    }

    async fn try_generate(&self, prompt: String) -> Result<String, String> {
        if let Some(limiter) = &self.limiter {
            limiter.check().await?;
        }

        let request = GenerateContentRequest {
            system_instruction: Some(Content::system(SYSTEM_PROMPT)),
            contents: vec![Content::user(prompt)],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.7),
                top_p: Some(0.8),
                top_k: Some(40),
            }),
        };

        self.client
            .generate_content(request, None)
            .await
            .map_err(|e| format!("generation failed: {e}"))
    }
}

fn build_user_prompt(
    answers: &[Answer],
    demographics: Option<&Demographics>,
    score: u8,
    label: Tendency,
    category_scores: &IndexMap<String, CategoryScore>,
) -> String {
    let answers_context = answers
        .iter()
        .map(|a| {
            let choice = match a.choice {
                Choice::Left => "A",
                Choice::Right => "B",
            };
            format!(
                "질문 {}: {}번 선택 (점수: {})",
                a.question_id,
                choice,
                a.chosen_weight()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let demographics_context = match demographics {
        Some(d) => format!(
            "사용자 정보:\n- 연령대: {}\n- 성별: {}\n- 거주지역: {}",
            d.age.map(|a| a.korean()).unwrap_or("미제공"),
            d.gender.map(|g| g.korean()).unwrap_or("미제공"),
            d.region.map(|r| r.korean()).unwrap_or("미제공"),
        ),
        None => "사용자 정보: 미제공".to_string(),
    };

    let category_context = category_scores
        .values()
        .map(|c| format!("{}: {} ({}점)", c.name, c.tendency.korean(), c.score))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "다음 사용자의 정치 성향 밸런스 게임 결과를 분석해주세요:\n\n\
         {demographics_context}\n\n\
         응답 내역:\n{answers_context}\n\n\
         전체 정치 점수: {score}점 ({label_korean})\n\n\
         분야별 점수:\n{category_context}\n\n\
         위 정보를 바탕으로 이 사용자의 정치적 성향을 종합적으로 분석하고 해석해주세요.",
        label_korean = label.korean(),
    )
}

/// Canned analysis paragraphs, one per overall label.
pub fn fallback_analysis(label: Tendency) -> &'static str {
    match label {
        Tendency::Progressive => {
            "당신은 **진보적 성향**을 보이고 있습니다. 사회적 평등과 복지 확대를 중시하며, 환경 보호와 인권 문제에 대해 적극적인 자세를 보입니다.\n\n\
             경제적으로는 국가의 역할을 중요하게 생각하고, 시장 실패를 보완하는 정책을 지지하는 경향이 있습니다. 사회 문제에 대해서는 개방적이고 포용적인 접근을 선호합니다.\n\n\
             외교와 안보에서는 대화와 협력을 통한 평화적 해결을 우선시하며, 군사적 대응보다는 외교적 노력을 중시하는 모습을 보입니다.\n\n\
             전반적으로 사회 변화에 적극적이고, 기존 제도의 개선을 통해 더 나은 사회를 만들어가려는 의지가 강한 성향입니다."
        }
        Tendency::CenterProgressive => {
            "당신은 **중도-진보 성향**을 보이고 있습니다. 진보적 가치를 추구하면서도 현실적 제약을 고려하는 균형잡힌 접근을 선호합니다.\n\n\
             복지와 사회 안전망의 필요성을 인정하면서도, 경제 성장과의 조화를 중시합니다. 사회 변화에 대해서는 점진적이고 안정적인 발전을 추구하는 경향을 보입니다.\n\n\
             안보와 외교 분야에서는 평화적 해결을 선호하되, 현실적 안보 위협에 대한 대비도 필요하다고 생각합니다.\n\n\
             실용적이고 합리적인 정책 판단을 중시하며, 이념보다는 효과적인 문제 해결에 초점을 맞추는 성향을 보입니다."
        }
        Tendency::Center => {
            "당신은 **중도 성향**을 보이고 있습니다. 좌우 어느 한쪽에 치우치지 않고 균형잡힌 관점으로 정치적 이슈를 바라보는 특징을 보입니다.\n\n\
             경제 정책에서는 시장 경제의 효율성을 인정하면서도 필요한 곳에는 정부의 개입이 필요하다고 생각합니다. 복지와 성장, 효율성과 형평성 사이의 균형을 추구합니다.\n\n\
             사회 문제에 대해서는 전통적 가치와 새로운 변화 모두를 고려하며, 급진적 변화보다는 점진적 개선을 선호하는 경향을 보입니다.\n\n\
             정치적 의사결정에서는 이념보다는 실용성과 효과를 중시하며, 상황과 맥락에 따라 유연한 판단을 하는 성향을 가지고 있습니다."
        }
        Tendency::CenterConservative => {
            "당신은 **중도-보수 성향**을 보이고 있습니다. 보수적 가치를 기본으로 하면서도 필요에 따라 개혁과 변화를 수용하는 유연성을 보입니다.\n\n\
             경제적으로는 시장 경제와 자유 경쟁을 선호하지만, 사회적 안전망의 필요성도 어느 정도 인정합니다. 개인의 책임과 노력을 중시하면서도 사회적 배려가 필요한 부분을 인식합니다.\n\n\
             전통적 가치와 질서를 중시하면서도, 시대적 변화에 맞는 점진적 개선은 필요하다고 생각합니다.\n\n\
             안보와 외교에서는 확고한 대비를 중시하되, 대화와 협상의 여지도 열어두는 신중한 접근을 선호하는 경향을 보입니다."
        }
        Tendency::Conservative => {
            "당신은 **보수적 성향**을 보이고 있습니다. 전통적 가치와 기존 질서를 중시하며, 안정적이고 점진적인 발전을 추구하는 특징을 보입니다.\n\n\
             경제적으로는 자유시장 경제를 강하게 지지하며, 개인의 책임과 자율을 중시합니다. 정부의 시장 개입은 최소화하고, 기업의 자유로운 경제활동을 통한 성장을 선호합니다.\n\n\
             사회적으로는 전통적 가치와 질서를 중시하며, 급격한 사회 변화보다는 안정적인 발전을 추구합니다. 법과 질서, 사회적 규범의 중요성을 강조합니다.\n\n\
             안보와 외교에서는 확고한 안보 태세와 동맹 관계를 중시하며, 국가의 안전과 이익을 최우선으로 고려하는 현실주의적 접근을 선호합니다."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use quiz_common::gemini::{GeminiClient, GeminiClientConfig};

    use crate::catalog::QuestionCatalog;
    use crate::descriptions::DescriptionTable;
    use crate::model::{AgeBracket, Gender};
    use crate::scoring;

    fn unconfigured_client() -> GeminiClient {
        GeminiClient::new(GeminiClientConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: None,
            model: "gemini-2.5-pro".to_string(),
            default_timeout: Duration::from_millis(100),
            max_retries: 0,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(1),
            max_error_body_bytes: 1024,
        })
        .expect("client builds")
    }

    fn sample_inputs() -> (Vec<Answer>, IndexMap<String, CategoryScore>) {
        let catalog = QuestionCatalog::standard();
        let answers: Vec<Answer> = catalog
            .questions()
            .iter()
            .map(|q| Answer {
                question_id: q.id,
                choice: Choice::Left,
                left_weight: q.left_weight,
                right_weight: q.right_weight,
            })
            .collect();
        let categories = scoring::category_scores(&answers, &catalog, &DescriptionTable::standard());
        (answers, categories)
    }

    #[test]
    fn user_prompt_contains_all_context() {
        let (answers, categories) = sample_inputs();
        let demographics = Demographics {
            age: Some(AgeBracket::Twenties),
            gender: Some(Gender::Female),
            region: None,
        };

        let prompt =
            build_user_prompt(&answers, Some(&demographics), 0, Tendency::Progressive, &categories);

        assert!(prompt.contains("질문 1: A번 선택 (점수: -2)"));
        assert!(prompt.contains("전체 정치 점수: 0점 (진보)"));
        assert!(prompt.contains("- 연령대: 20대"));
        assert!(prompt.contains("- 성별: 여성"));
        assert!(prompt.contains("- 거주지역: 미제공"));
        assert!(prompt.contains("경제 / 복지: 진보 (0점)"));
    }

    #[test]
    fn user_prompt_without_demographics() {
        let (answers, categories) = sample_inputs();
        let prompt = build_user_prompt(&answers, None, 50, Tendency::Center, &categories);
        assert!(prompt.contains("사용자 정보: 미제공"));
        assert!(prompt.contains("(중도)"));
    }

    #[test]
    fn fallback_covers_every_label() {
        for label in Tendency::ALL {
            let text = fallback_analysis(label);
            assert!(
                text.contains(label.korean()),
                "fallback for {label} should mention its Korean label"
            );
        }
        assert!(fallback_analysis(Tendency::Progressive).starts_with("당신은 **진보적 성향**"));
        assert!(fallback_analysis(Tendency::Conservative).starts_with("당신은 **보수적 성향**"));
    }

    #[tokio::test]
    async fn analyze_falls_back_without_api_key() {
        let (answers, categories) = sample_inputs();
        let service = NarrativeService::new(unconfigured_client(), None);
        let text = service
            .analyze(&answers, None, 0, Tendency::Progressive, &categories)
            .await;
        assert_eq!(text, fallback_analysis(Tendency::Progressive));
    }

    #[tokio::test]
    async fn analyze_falls_back_when_rate_limited() {
        let (answers, categories) = sample_inputs();
        let limiter = RateLimiter::with_rps(1);
        limiter.check().await.expect("first token");
        let service = NarrativeService::new(unconfigured_client(), Some(limiter));
        let text = service
            .analyze(&answers, None, 72, Tendency::Conservative, &categories)
            .await;
        assert_eq!(text, fallback_analysis(Tendency::Conservative));
    }
}
