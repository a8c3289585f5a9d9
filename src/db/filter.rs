use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::{QueryBuilder, Sqlite};

use crate::error::{Error, Result};

/// The two words a list page's `status` query value may take for one boolean
/// column. Anything else means "no status filter".
#[derive(Debug, Clone, Copy)]
pub struct StatusWords {
    pub set: &'static str,
    pub unset: &'static str,
}

pub const INVOICE_STATUS: StatusWords = StatusWords { set: "paid", unset: "unpaid" };
pub const QUOTE_STATUS: StatusWords = StatusWords { set: "converted", unset: "pending" };

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(raw: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| Error::Validation(format!("{field} '{raw}' is not a YYYY-MM-DD date")))
}

/// Conjunctive filter shared by the invoice and quote list pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    /// Case-insensitive substring of the client's name.
    pub search: Option<String>,
    pub flag: Option<bool>,
    /// Inclusive, compared against the calendar day of `date_created`.
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl ListFilter {
    /// Builds a filter from raw query values. Empty strings count as absent.
    pub fn from_query(
        search: Option<&str>,
        status: Option<&str>,
        date_from: Option<&str>,
        date_to: Option<&str>,
        words: StatusWords,
    ) -> Result<Self> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.map(str::trim).filter(|v| !v.is_empty())
        }

        let flag = match present(status) {
            Some(s) if s == words.set => Some(true),
            Some(s) if s == words.unset => Some(false),
            _ => None,
        };

        Ok(Self {
            search: present(search).map(str::to_string),
            flag,
            date_from: present(date_from).map(|d| parse_date(d, "date_from")).transpose()?,
            date_to: present(date_to).map(|d| parse_date(d, "date_to")).transpose()?,
        })
    }

    /// Appends ` AND ...` clauses to a query that already has a `WHERE`.
    /// The client table must be aliased `c`.
    pub fn push_conditions(&self, query: &mut QueryBuilder<'_, Sqlite>, flag_column: &str, date_column: &str) {
        if let Some(search) = &self.search {
            query
                .push(" AND instr(lower(c.name), lower(")
                .push_bind(search.clone())
                .push(")) > 0");
        }

        if let Some(flag) = self.flag {
            query.push(format!(" AND {flag_column} = ")).push_bind(flag);
        }

        if let Some(from) = self.date_from {
            query
                .push(format!(" AND {date_column} >= "))
                .push_bind(start_of(from));
        }

        if let Some(next_day) = self.date_to.and_then(|to| to.succ_opt()) {
            query
                .push(format!(" AND {date_column} < "))
                .push_bind(start_of(next_day));
        }
    }
}

fn start_of(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}
