// Wire formats produced by cytocall.

pub mod dto;
pub mod html;
