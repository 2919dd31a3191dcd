pub mod interviews;
pub mod panels;
pub mod plot;
pub mod table;
