pub mod delay;
pub mod document;
pub mod listener;
pub mod request;
pub mod response;
pub mod selector;
