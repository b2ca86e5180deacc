// Adapters layer: concrete implementations of the domain ports against
// external systems (spreadsheet files on disk).

pub mod excel;
