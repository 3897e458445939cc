//! Interactive console
//!
//! One line per turn, comma-separated URLs. `exit` / `quit` anywhere in the
//! line ends the session once the URLs before it are judged.

use std::io::{self, BufRead, Write};

use crate::logic::features::FeatureProbe;
use crate::logic::judgment::{JudgmentLoop, LabelSource, Operator, RetrainOutcome, UrlOutcome};
use crate::logic::model::Classifier;
use crate::logic::threat::Label;

const EXIT_MESSAGE: &str = "Exiting the URL classifier. Goodbye!";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInput {
    pub urls: Vec<String>,
    /// Sentinel seen; end the session after these URLs
    pub exit: bool,
}

pub fn parse_batch(line: &str) -> BatchInput {
    let mut urls = Vec::new();

    for entry in line.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        if entry.eq_ignore_ascii_case("exit") || entry.eq_ignore_ascii_case("quit") {
            return BatchInput { urls, exit: true };
        }
        urls.push(entry.to_string());
    }

    BatchInput { urls, exit: false }
}

/// Line-based operator over any reader / writer pair
pub struct ConsoleOperator<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleOperator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Print `prompt`, read one line; None at end of input
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, text: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    fn try_review(&mut self, url: &str, proposed: Label, source: LabelSource) -> io::Result<Option<Label>> {
        self.say(format_args!("\nThe URL '{}' is not in the dataset ({}: {}).", url, source, proposed))?;

        let answer = match self.ask("Would you like to add it with your own label? (y/n): ")? {
            Some(answer) => answer,
            None => return Ok(None),
        };
        if !matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes") {
            return Ok(None);
        }

        let mut prompt = "Please specify if the URL is 'Safe' or 'Malicious': ";
        loop {
            match self.ask(prompt)? {
                None => return Ok(None),
                Some(text) => match text.parse::<Label>() {
                    Ok(label) => return Ok(Some(label)),
                    Err(_) => prompt = "Invalid input. Please specify 'Safe' or 'Malicious': ",
                },
            }
        }
    }
}

impl<R: BufRead, W: Write> Operator for ConsoleOperator<R, W> {
    fn review(&mut self, url: &str, proposed: Label, source: LabelSource) -> Option<Label> {
        match self.try_review(url, proposed, source) {
            Ok(label) => label,
            Err(e) => {
                log::warn!("Operator prompt failed for {}: {}", url, e);
                None
            }
        }
    }
}

/// Read batches until the sentinel or end of input
pub fn run_session<P, C, R, W>(judge: &mut JudgmentLoop<P, C>, console: &mut ConsoleOperator<R, W>) -> io::Result<()>
where
    P: FeatureProbe,
    C: Classifier + Clone,
    R: BufRead,
    W: Write,
{
    if !judge.is_ready() {
        console.say("No trained model yet: URLs will be labeled Malicious until the dataset has rows.")?;
    }

    loop {
        let line = match console.ask("\nEnter URLs separated by commas (or 'exit' to quit): ")? {
            Some(line) => line,
            None => break,
        };

        let batch = parse_batch(&line);
        if !batch.urls.is_empty() {
            let report = judge.run_batch(&batch.urls, &mut *console);

            console.say("")?;
            for outcome in &report.outcomes {
                match outcome {
                    UrlOutcome::Judged(judgment) => console.say(judgment)?,
                    UrlOutcome::Failed { url, error } => console.say(format_args!("{} -> error: {}", url, error))?,
                }
            }

            match &report.retrain {
                RetrainOutcome::Trained(state) => {
                    console.say(format_args!("\nModel retrained (accuracy {:.2})", state.report.accuracy))?;
                    console.say(&state.report)?;
                }
                RetrainOutcome::Failed(e) => console.say(format_args!("\nRetraining skipped: {}", e))?,
            }
        }

        if batch.exit {
            break;
        }
    }

    console.say(EXIT_MESSAGE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::logic::dataset::DatasetStore;
    use crate::logic::features::{FeatureSchema, FeatureVector};
    use crate::logic::model::{ClassifierAdapter, RandomForest};
    use tempfile::tempdir;

    struct ZeroProbe;

    impl FeatureProbe for ZeroProbe {
        fn schema(&self) -> FeatureSchema {
            FeatureSchema::TwoSignal
        }

        fn extract(&self, _url: &str) -> FeatureVector {
            FeatureVector::zeroed(FeatureSchema::TwoSignal)
        }
    }

    fn operator(input: &str) -> ConsoleOperator<Cursor<Vec<u8>>, Vec<u8>> {
        ConsoleOperator::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_parse_batch() {
        assert_eq!(
            parse_batch(" x.com, y.com ,,  "),
            BatchInput { urls: vec!["x.com".into(), "y.com".into()], exit: false }
        );
        assert_eq!(
            parse_batch("x.com, y.com, exit"),
            BatchInput { urls: vec!["x.com".into(), "y.com".into()], exit: true }
        );
        assert_eq!(
            parse_batch("a.com, QUIT, b.com"),
            BatchInput { urls: vec!["a.com".into()], exit: true }
        );
        assert_eq!(parse_batch(""), BatchInput { urls: vec![], exit: false });
    }

    #[test]
    fn test_operator_declines() {
        let mut console = operator("n\n");
        assert_eq!(console.review("a.com", Label::Safe, LabelSource::Predicted), None);
    }

    #[test]
    fn test_operator_reprompts_until_valid_label() {
        let mut console = operator("Y\nbenign\n\nmalicious\n");
        assert_eq!(
            console.review("a.com", Label::Safe, LabelSource::Predicted),
            Some(Label::Malicious)
        );

        let (_, output) = console.into_inner();
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Invalid input").count(), 2);
    }

    #[test]
    fn test_prompt_names_where_the_label_came_from() {
        let mut console = operator("n\n");
        console.review("a.com", Label::Malicious, LabelSource::FailClosed);
        let (_, output) = console.into_inner();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("(no model yet, fail-closed: Malicious)"));
        assert!(!text.contains("predicted"));

        let mut console = operator("n\n");
        console.review("a.com", Label::Safe, LabelSource::Predicted);
        let (_, output) = console.into_inner();
        assert!(String::from_utf8(output).unwrap().contains("(predicted: Safe)"));
    }

    #[test]
    fn test_operator_end_of_input_is_no_override() {
        let mut console = operator("y\n");
        assert_eq!(console.review("a.com", Label::Safe, LabelSource::Predicted), None);
    }

    #[test]
    fn test_session_processes_urls_before_exit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("d.csv");
        let store = DatasetStore::open(&path, FeatureSchema::TwoSignal).unwrap();
        let adapter = ClassifierAdapter::new(RandomForest::new(5, 42));
        let mut judge = JudgmentLoop::new(store, adapter, ZeroProbe).unwrap();

        // Both URLs are unseen: decline the operator prompt for each
        let mut console = operator("x.com, y.com, exit\nn\nn\nz.com\n");
        run_session(&mut judge, &mut console).unwrap();

        let (_, output) = console.into_inner();
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("x.com -> Malicious").count(), 1);
        assert_eq!(text.matches("y.com -> Malicious").count(), 1);
        assert!(!text.contains("z.com"));
        assert!(text.contains("precision"));
        assert!(text.trim_end().ends_with(EXIT_MESSAGE));

        assert_eq!(judge.store().len(), 2);
    }

    #[test]
    fn test_session_ends_at_end_of_input() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::open(dir.path().join("d.csv"), FeatureSchema::TwoSignal).unwrap();
        let adapter = ClassifierAdapter::new(RandomForest::new(5, 42));
        let mut judge = JudgmentLoop::new(store, adapter, ZeroProbe).unwrap();

        let mut console = operator("");
        run_session(&mut judge, &mut console).unwrap();

        let (_, output) = console.into_inner();
        assert!(String::from_utf8(output).unwrap().contains(EXIT_MESSAGE));
    }
}
