pub mod powercap;
