/// Externally supplied identifier of a transaction (unique for the lifetime of a scheduler).
///
/// Identifiers are chosen by whoever submits operations, e.g. `1` in `r1(x)`. They carry no
/// ordering meaning; the age of a transaction is given by its registration timestamp instead.
pub type TxnId = u64;

/// Identifier of a row inside a table.
pub type RowId = u64;

/// Index of a page inside a table.
pub type PageIndex = usize;
