pub mod medication;
pub mod missed;
pub mod today;
