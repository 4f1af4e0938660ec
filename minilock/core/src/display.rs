//! Tabular rendering of scheduler state.

use std::fmt;

use itertools::Itertools;
use minilock_catalog::TableRef;
use minilock_scheduler::{LockRecord, Scheduler, WaitForGraph};
use minilock_transaction::{Operation, Transaction};
use tabled::builder::Builder;
use tabled::settings::{Style, Theme};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    #[default]
    Sharp,
    Modern,
    Psql,
    Markdown,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TableOptions {
    style: TableStyle,
}

impl TableOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    #[inline]
    pub fn style(&self) -> TableStyle {
        self.style
    }
}

#[derive(Debug)]
pub struct TableBuilder {
    options: TableOptions,
    has_header: bool,
    builder: Builder,
}

impl TableBuilder {
    pub fn new<I>(header: Option<I>, options: TableOptions) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut builder = Builder::new();
        let has_header = header.is_some();
        if let Some(header) = header {
            builder.push_record(header.into_iter().map(Into::into));
        }
        Self {
            options,
            has_header,
            builder,
        }
    }

    #[inline]
    pub fn append_row<I>(mut self, row: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.builder.push_record(row.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Table {
        let mut table = self.builder.build();
        let mut theme = match self.options.style {
            TableStyle::Sharp => Theme::from_style(Style::sharp()),
            TableStyle::Modern => Theme::from_style(Style::modern()),
            TableStyle::Psql => Theme::from_style(Style::psql()),
            TableStyle::Markdown => Theme::from_style(Style::markdown()),
        };
        match self.options.style {
            TableStyle::Sharp => {
                if !self.has_header || table.count_rows() == 1 {
                    theme.remove_horizontal_lines();
                }
            }
            TableStyle::Psql | TableStyle::Markdown => {
                if !self.has_header {
                    theme.remove_horizontal_lines();
                }
            }
            TableStyle::Modern => (),
        }
        table.with(theme);
        Table(table)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table(tabled::Table);

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The schedule trace, one numbered operation per row.
pub fn schedule_table(ops: &[Operation], options: TableOptions) -> Table {
    ops.iter()
        .enumerate()
        .fold(
            TableBuilder::new(Some(["#", "txn", "operation"]), options),
            |builder, (i, op)| {
                builder.append_row([(i + 1).to_string(), op.txn().to_string(), op.to_string()])
            },
        )
        .build()
}

pub fn lock_table(locks: &[LockRecord], options: TableOptions) -> Table {
    let header = ["txn", "table", "object", "mode", "status", "granularity"];
    locks
        .iter()
        .fold(TableBuilder::new(Some(header), options), |builder, l| {
            builder.append_row([
                l.txn().to_string(),
                l.table().to_string(),
                l.object().to_string(),
                l.mode().to_string(),
                l.status().to_string(),
                l.granularity().to_string(),
            ])
        })
        .build()
}

/// Every registered transaction with its state: `aborted`, `blocked` while it has waiting locks
/// or deferred operations, and `active` otherwise.
pub fn transaction_table(scheduler: &Scheduler, options: TableOptions) -> Table {
    let header = ["txn", "timestamp", "state", "deferred"];
    scheduler
        .transactions()
        .iter()
        .fold(TableBuilder::new(Some(header), options), |builder, txn| {
            builder.append_row([
                txn.id().to_string(),
                txn.timestamp().raw().to_string(),
                transaction_state(scheduler, txn).to_string(),
                txn.deferred().iter().join(" "),
            ])
        })
        .build()
}

fn transaction_state(scheduler: &Scheduler, txn: &Transaction) -> &'static str {
    if txn.is_aborted() {
        "aborted"
    } else if txn.has_deferred() || scheduler.locks_of(txn.id()).any(LockRecord::is_waiting) {
        "blocked"
    } else {
        "active"
    }
}

pub fn graph_table(graph: &WaitForGraph, options: TableOptions) -> Table {
    graph
        .adjacency()
        .iter()
        .filter(|(_, holders)| !holders.is_empty())
        .fold(
            TableBuilder::new(Some(["waiter", "waits for"]), options),
            |builder, (waiter, holders)| {
                builder.append_row([waiter.to_string(), holders.iter().join(" ")])
            },
        )
        .build()
}

pub fn catalog_table(tables: &[TableRef], options: TableOptions) -> Table {
    tables
        .iter()
        .fold(
            TableBuilder::new(Some(["table", "area", "pages", "rows"]), options),
            |builder, t| {
                builder.append_row([
                    t.name().to_string(),
                    t.area().name().to_string(),
                    t.pages().len().to_string(),
                    t.num_rows().to_string(),
                ])
            },
        )
        .build()
}
