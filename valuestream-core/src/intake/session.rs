//! A question-by-question intake that fills a draft dataset from short free-text answers.

use super::{
    tabular::{merge_into, ImportReport},
    units::{parse_number_loose, parse_per_day, percent_or_plain, seconds_or_plain},
};
use serde::Serialize;
use tracing::debug;
use valuestream_schemas::{dataset::Dataset, process::Process};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Question {
    CustomerDemand,
    ProcessNames,
    CycleTimes,
    Changeovers,
    Uptimes,
    Wip,
}

impl Question {
    pub fn prompt(&self) -> &'static str {
        match self {
            Question::CustomerDemand => "What is the customer demand per day (units/day)?",
            Question::ProcessNames => {
                "List your process steps in order, separated by commas (e.g., Cut, Weld, Paint, Pack)."
            }
            Question::CycleTimes => {
                "Provide cycle times for each step, in order (seconds or with units, e.g., 45s, 2 min)."
            }
            Question::Changeovers => {
                "Provide changeover times for each step, in order (e.g., 0, 10 min, 1h)."
            }
            Question::Uptimes => "Provide uptime % for each step, in order (e.g., 95%, 90, 88%).",
            Question::Wip => {
                "Provide WIP units between steps (N-1 values for N steps, e.g., 20, 35, 15)."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct GuidedSession {
    draft: Dataset,
    transcript: Vec<Turn>,
}

impl Default for GuidedSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GuidedSession {
    pub fn new() -> Self {
        Self::from_draft(Dataset::default())
    }

    /// Resumes from a partially filled dataset; only missing answers are asked for.
    pub fn from_draft(draft: Dataset) -> Self {
        let mut session = Self {
            draft,
            transcript: Vec::new(),
        };
        let opening = match session.next_question() {
            Some(question) => format!(
                "Let's build your value stream map. {}",
                question.prompt()
            ),
            None => "Your map is complete. Edit any field or import a table.".to_string(),
        };
        session.say(opening);
        session
    }

    pub fn draft(&self) -> &Dataset {
        &self.draft
    }

    pub fn into_dataset(self) -> Dataset {
        self.draft
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// The first unanswered question, in a fixed order.
    pub fn next_question(&self) -> Option<Question> {
        let processes = &self.draft.processes;
        if self.draft.positive_demand().is_none() {
            Some(Question::CustomerDemand)
        } else if processes.is_empty() {
            Some(Question::ProcessNames)
        } else if processes.iter().any(|p| p.cycle_time_sec.is_none()) {
            Some(Question::CycleTimes)
        } else if processes.iter().any(|p| p.changeover_sec.is_none()) {
            Some(Question::Changeovers)
        } else if processes.iter().any(|p| p.uptime_pct.is_none()) {
            Some(Question::Uptimes)
        } else if processes.len() > 1 && processes[1..].iter().any(|p| p.wip_units.is_none()) {
            Some(Question::Wip)
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.next_question().is_none()
    }

    /// Applies one answer to the current question and returns the replies it produced.
    ///
    /// An answer that cannot be read leaves the draft untouched and re-asks.
    pub fn answer(&mut self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        self.transcript.push(Turn {
            speaker: Speaker::User,
            text: text.to_string(),
        });

        let mut replies = Vec::new();
        match self.next_question() {
            Some(question) => {
                match self.apply(question, text) {
                    Ok(ack) => {
                        debug!(?question, "answer accepted");
                        replies.push(ack);
                        replies.push(match self.next_question() {
                            Some(next) => format!("Next: {}", next.prompt()),
                            None => "All set. You can now review the map and metrics.".to_string(),
                        });
                    }
                    Err(hint) => {
                        debug!(?question, answer = text, "answer rejected");
                        replies.push(hint);
                    }
                }
            }
            None => replies
                .push("Noted. Edit fields directly or import a table to make changes.".to_string()),
        }

        for reply in &replies {
            self.say(reply.clone());
        }
        replies
    }

    /// Replaces the drafted steps with an imported table.
    pub fn import_table(&mut self, report: ImportReport) -> String {
        let rows = report.row_count();
        merge_into(&mut self.draft, report.dataset);
        let reply = format!("Parsed {} rows from the table. Review and adjust as needed.", rows);
        self.say(reply.clone());
        reply
    }

    fn say(&mut self, text: String) {
        self.transcript.push(Turn {
            speaker: Speaker::System,
            text,
        });
    }

    fn apply(&mut self, question: Question, text: &str) -> Result<String, String> {
        let count = self.draft.processes.len();
        match question {
            Question::CustomerDemand => {
                let demand = parse_per_day(text)
                    .or_else(|| parse_number_loose(text))
                    .filter(|d| *d > 0.0)
                    .ok_or_else(|| {
                        "Please provide a positive number for customer demand per day (e.g., 480)."
                            .to_string()
                    })?;
                self.draft.customer_demand_per_day = Some(demand);
                Ok(format!("Got it. Customer demand = {} units/day.", demand))
            }
            Question::ProcessNames => {
                let names: Vec<&str> = text
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect();
                if names.is_empty() {
                    return Err("Please list at least one process step.".to_string());
                }
                self.draft.processes = names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| Process::new(format!("P{}", i + 1), *name))
                    .collect();
                Ok(format!("Great. I recorded {} process steps.", names.len()))
            }
            Question::CycleTimes => {
                let values = parse_list(text, count, seconds_or_plain)?;
                for (process, value) in self.draft.processes.iter_mut().zip(values) {
                    process.cycle_time_sec = Some(value);
                }
                Ok("Cycle times recorded.".to_string())
            }
            Question::Changeovers => {
                let values = parse_list(text, count, seconds_or_plain)?;
                for (process, value) in self.draft.processes.iter_mut().zip(values) {
                    process.changeover_sec = Some(value);
                }
                Ok("Changeover times recorded.".to_string())
            }
            Question::Uptimes => {
                let values = parse_list(text, count, percent_or_plain)?;
                for (process, value) in self.draft.processes.iter_mut().zip(values) {
                    process.uptime_pct = Some(value);
                }
                Ok("Uptime recorded.".to_string())
            }
            Question::Wip => {
                let values = parse_list(text, count.saturating_sub(1), parse_number_loose)?;
                if let Some(first) = self.draft.processes.first_mut() {
                    first.wip_units = Some(0.0);
                }
                for (process, value) in self.draft.processes.iter_mut().skip(1).zip(values) {
                    process.wip_units = Some(value);
                }
                Ok("WIP recorded.".to_string())
            }
        }
    }
}

fn parse_list(text: &str, expected: usize, parse: fn(&str) -> Option<f64>) -> Result<Vec<f64>, String> {
    let values: Option<Vec<f64>> = text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse)
        .collect();
    match values {
        Some(values) if values.len() == expected => Ok(values),
        _ => Err(format!(
            "Please provide {} values separated by commas.",
            expected
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_answer_reasks_without_changing_draft() {
        let mut session = GuidedSession::new();
        let replies = session.answer("lots");
        assert_eq!(replies.len(), 1);
        assert!(replies[0].contains("positive number"));
        assert_eq!(session.next_question(), Some(Question::CustomerDemand));
        assert!(session.draft().customer_demand_per_day.is_none());
    }

    #[test]
    fn single_step_needs_no_wip() {
        let mut session = GuidedSession::new();
        session.answer("100/day");
        session.answer("Assemble");
        session.answer("60");
        session.answer("0");
        session.answer("95%");
        assert!(session.is_complete());
    }

    #[test]
    fn blank_answer_is_ignored() {
        let mut session = GuidedSession::new();
        let before = session.transcript().len();
        assert!(session.answer("   ").is_empty());
        assert_eq!(session.transcript().len(), before);
    }
}
