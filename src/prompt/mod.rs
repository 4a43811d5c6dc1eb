//! Console interaction and product disambiguation

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

use crate::error::ScanError;
use crate::models::ProductCandidate;
use crate::traits::Prompt;

/// Prompt reading lines from stdin and writing to stdout
pub struct StdinPrompt {
    lines: Lines<BufReader<Stdin>>,
    stdout: Stdout,
}

impl StdinPrompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            stdout: tokio::io::stdout(),
        }
    }
}

#[async_trait]
impl Prompt for StdinPrompt {
    async fn say(&mut self, line: &str) -> Result<()> {
        self.stdout.write_all(line.as_bytes()).await?;
        self.stdout.write_all(b"\n").await?;
        self.stdout.flush().await?;
        Ok(())
    }

    async fn ask(&mut self, question: &str) -> Result<Option<String>> {
        self.stdout.write_all(question.as_bytes()).await?;
        self.stdout.flush().await?;
        Ok(self.lines.next_line().await?)
    }
}

/// Pick one candidate, asking the user only when there is a choice to make.
///
/// Re-prompts until a 1-based number within range is entered.
///
/// # Returns
/// * `(index, candidate)` - 0-based position of the chosen candidate
pub async fn choose_product<'a>(
    candidates: &'a [ProductCandidate],
    prompt: &mut dyn Prompt,
) -> Result<(usize, &'a ProductCandidate)> {
    match candidates {
        [] => Err(ScanError::Selection("no products to choose from".to_string()).into()),
        [only] => Ok((0, only)),
        _ => {
            prompt.say("\nMultiple products found with same number:").await?;
            for (idx, product) in candidates.iter().enumerate() {
                prompt
                    .say(&format!(
                        "{}: {} | Set: {} | Market Price: {} | ID: {}",
                        idx + 1,
                        product.name,
                        product.set_name,
                        product.market_price,
                        product.catalog_id
                    ))
                    .await?;
            }

            loop {
                let Some(answer) = prompt.ask("Select product number to lookup: ").await? else {
                    return Err(ScanError::Selection("input closed before a product was chosen".to_string()).into());
                };

                match answer.trim().parse::<usize>() {
                    Ok(choice) if (1..=candidates.len()).contains(&choice) => {
                        return Ok((choice - 1, &candidates[choice - 1]));
                    }
                    Ok(_) => prompt.say("Invalid selection. Try again.").await?,
                    Err(_) => prompt.say("Please enter a valid number.").await?,
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// Prompt answering from a fixed script and recording everything shown
    #[derive(Default)]
    pub(crate) struct ScriptedPrompt {
        pub answers: VecDeque<String>,
        pub output: Vec<String>,
        pub questions: usize,
    }

    impl ScriptedPrompt {
        pub fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| (*a).to_string()).collect(),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl Prompt for ScriptedPrompt {
        async fn say(&mut self, line: &str) -> Result<()> {
            self.output.push(line.to_string());
            Ok(())
        }

        async fn ask(&mut self, question: &str) -> Result<Option<String>> {
            self.questions += 1;
            self.output.push(question.to_string());
            Ok(self.answers.pop_front())
        }
    }

    fn candidate(id: &str, set: &str) -> ProductCandidate {
        ProductCandidate {
            name: "Charizard".to_string(),
            set_name: set.to_string(),
            catalog_id: id.to_string(),
            detail_url: format!("/product/{set}"),
            market_price: "$1.00".to_string(),
        }
    }

    #[tokio::test]
    async fn single_candidate_is_chosen_silently() {
        let candidates = vec![candidate("#4/102", "base")];
        let mut prompt = ScriptedPrompt::new(&[]);

        let (idx, chosen) = choose_product(&candidates, &mut prompt).await.unwrap();

        assert_eq!(idx, 0);
        assert_eq!(chosen.set_name, "base");
        assert_eq!(prompt.questions, 0);
        assert!(prompt.output.is_empty());
    }

    #[tokio::test]
    async fn invalid_answers_are_reprompted() {
        let candidates = vec![
            candidate("#4/102", "base"),
            candidate("#4/102", "legendary"),
            candidate("#4/102", "celebrations"),
        ];
        let mut prompt = ScriptedPrompt::new(&["0", "abc", "4", " ", "2"]);

        let (idx, chosen) = choose_product(&candidates, &mut prompt).await.unwrap();

        assert_eq!(idx, 1);
        assert_eq!(chosen.set_name, "legendary");
        assert_eq!(prompt.questions, 5);
        assert!(prompt.answers.is_empty());

        let invalid = prompt.output.iter().filter(|l| *l == "Invalid selection. Try again.").count();
        let not_number = prompt.output.iter().filter(|l| *l == "Please enter a valid number.").count();
        assert_eq!(invalid, 2);
        assert_eq!(not_number, 2);
        assert!(prompt.output.contains(
            &"3: Charizard | Set: celebrations | Market Price: $1.00 | ID: #4/102".to_string()
        ));
    }

    #[tokio::test]
    async fn closed_input_is_a_selection_error() {
        let candidates = vec![candidate("#1", "a"), candidate("#1", "b")];
        let mut prompt = ScriptedPrompt::new(&["9"]);

        let err = choose_product(&candidates, &mut prompt).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ScanError>(), Some(ScanError::Selection(_))));
    }

    #[tokio::test]
    async fn empty_list_is_a_selection_error() {
        let mut prompt = ScriptedPrompt::new(&["1"]);
        assert!(choose_product(&[], &mut prompt).await.is_err());
        assert_eq!(prompt.questions, 0);
    }
}
