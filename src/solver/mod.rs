pub mod multi_start;
