//! UDP transport

pub mod socket;

pub use socket::{bind_alongside, bind_control, bind_sender, local_ip_toward, DatagramSender};
