//! Client for the token gateway's `POST /` operation.

mod client;

pub use client::{GatewayClient, GatewayResponse, Outcome, IDENTITY_HEADER};
