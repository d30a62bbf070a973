use crate::models::domain::{Question, QuestionKind};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// A well-formed mcq question whose answer is its first option.
    pub fn mcq_question(id: u32) -> Question {
        let options: Vec<String> = ["A", "B", "C", "D"]
            .iter()
            .map(|o| format!("Option {} of {}", o, id))
            .collect();
        Question {
            id,
            kind: QuestionKind::Mcq,
            text: format!("Multiple choice question {}", id),
            answer: options[0].clone(),
            options: Some(options),
        }
    }

    /// A well-formed true/false question.
    pub fn tf_question(id: u32) -> Question {
        Question {
            id,
            kind: QuestionKind::Tf,
            text: format!("Statement {} is true", id),
            options: Some(vec!["True".to_string(), "False".to_string()]),
            answer: "True".to_string(),
        }
    }

    /// `count` mcq questions numbered from 1.
    pub fn mcq_batch(count: u32) -> Vec<Question> {
        (1..=count).map(mcq_question).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_mcq_question() {
        let question = mcq_question(3);
        assert_eq!(question.options().len(), 4);
        assert!(question.options().contains(&question.answer));
    }

    #[test]
    fn test_fixtures_mcq_batch() {
        let batch = mcq_batch(5);
        assert_eq!(batch.len(), 5);
        assert_eq!(batch[0].id, 1);
        assert_eq!(batch[4].id, 5);
    }

    #[test]
    fn test_fixtures_tf_question() {
        let question = tf_question(1);
        assert_eq!(question.options().len(), 2);
        assert!(question.options().contains(&question.answer));
    }
}
