use super::{CapturedOutput, CommandRunner, Invocation, ProcessOutcome, RunnerError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResponseKey {
    program: String,
    subcommand: Option<String>,
}

impl ResponseKey {
    fn matches(&self, invocation: &Invocation) -> bool {
        self.program == invocation.program
            && match &self.subcommand {
                Some(sub) => invocation.subcommand() == Some(sub.as_str()),
                None => true,
            }
    }
}

/// Scripted runner that records every invocation.
///
/// Responses are queued per `(program, subcommand)`; the last queued response
/// repeats once the queue is drained. Unscripted commands succeed with empty
/// output.
#[derive(Debug, Default)]
pub struct MockRunner {
    calls: Mutex<Vec<Invocation>>,
    responses: Mutex<Vec<(ResponseKey, VecDeque<CapturedOutput>)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an outcome for `program` (and `subcommand`, when given)
    pub fn respond(&self, program: &str, subcommand: Option<&str>, outcome: ProcessOutcome) -> &Self {
        self.respond_output(
            program,
            subcommand,
            CapturedOutput {
                outcome,
                stdout: String::new(),
                stderr: String::new(),
            },
        )
    }

    /// Queues a full captured output for `program` (and `subcommand`, when given)
    pub fn respond_output(
        &self,
        program: &str,
        subcommand: Option<&str>,
        output: CapturedOutput,
    ) -> &Self {
        let key = ResponseKey {
            program: program.to_string(),
            subcommand: subcommand.map(str::to_string),
        };
        let mut responses = lock(&self.responses);
        match responses.iter_mut().find(|(k, _)| *k == key) {
            Some((_, queue)) => queue.push_back(output),
            None => responses.push((key, VecDeque::from([output]))),
        }
        self
    }

    /// All recorded invocations, in order
    pub fn calls(&self) -> Vec<Invocation> {
        lock(&self.calls).clone()
    }

    /// Recorded invocations of `program` with the given subcommand
    pub fn calls_for(&self, program: &str, subcommand: &str) -> Vec<Invocation> {
        lock(&self.calls)
            .iter()
            .filter(|c| c.program == program && c.subcommand() == Some(subcommand))
            .cloned()
            .collect()
    }

    pub fn count(&self, program: &str, subcommand: &str) -> usize {
        self.calls_for(program, subcommand).len()
    }

    fn next_response(&self, invocation: &Invocation) -> CapturedOutput {
        lock(&self.calls).push(invocation.clone());

        let mut responses = lock(&self.responses);
        // Subcommand-specific scripts take precedence over program-wide ones
        let index = responses
            .iter()
            .position(|(k, _)| k.subcommand.is_some() && k.matches(invocation))
            .or_else(|| responses.iter().position(|(k, _)| k.matches(invocation)));

        let Some(index) = index else {
            return CapturedOutput {
                outcome: ProcessOutcome::Success,
                stdout: String::new(),
                stderr: String::new(),
            };
        };

        let queue = &mut responses[index].1;
        if queue.len() > 1 {
            queue.pop_front().unwrap_or_else(CapturedOutput::not_found)
        } else {
            queue.front().cloned().unwrap_or_else(CapturedOutput::not_found)
        }
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn status(&self, invocation: &Invocation) -> Result<ProcessOutcome, RunnerError> {
        Ok(self.next_response(invocation).outcome)
    }

    async fn output(&self, invocation: &Invocation) -> Result<CapturedOutput, RunnerError> {
        Ok(self.next_response(invocation))
    }
}
