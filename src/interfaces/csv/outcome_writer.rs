use crate::domain::customer::OnboardOutcome;
use crate::interfaces::problem::ProblemDetail;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Serialize)]
struct OutcomeRow<'a> {
    row: usize,
    email: &'a str,
    status: String,
    http_status: u16,
    account_number: &'a str,
    detail: &'a str,
}

/// Writes one CSV line per processed submission.
///
/// Columns: `row,email,status,http_status,account_number,detail`.
pub struct OutcomeWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_success(
        &mut self,
        row: usize,
        email: &str,
        outcome: &OnboardOutcome,
    ) -> Result<(), csv::Error> {
        self.writer.serialize(OutcomeRow {
            row,
            email,
            status: outcome.status.to_string(),
            http_status: 201,
            account_number: &outcome.account_number,
            detail: &outcome.message,
        })
    }

    pub fn write_failure(
        &mut self,
        row: usize,
        email: &str,
        problem: &ProblemDetail,
    ) -> Result<(), csv::Error> {
        self.writer.serialize(OutcomeRow {
            row,
            email,
            status: problem.title.clone(),
            http_status: problem.status,
            account_number: "",
            detail: &problem.detail,
        })
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
