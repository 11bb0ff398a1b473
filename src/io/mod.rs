pub mod fastx;
pub mod tables;

pub use fastx::{read_fastx, read_first_record, read_records, write_fasta, write_fastx, FastxRecord};
