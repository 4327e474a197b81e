use quiz_common::error::CommonError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("config error: {0}")]
    Config(String),

    #[error("answer references unknown question {question_id}")]
    InvalidAnswer { question_id: u32 },

    #[error("duplicate answer for question {question_id}")]
    DuplicateAnswer { question_id: u32 },

    #[error("incomplete submission: {answered} of {expected} questions answered")]
    IncompleteSubmission { answered: usize, expected: usize },

    #[error("result not found: {0}")]
    NotFound(String),
}
