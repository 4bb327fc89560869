//! Scheduled watchlist detection on live video.
//!
//! A capture loop samples frames during configured time-of-day windows and
//! hands them to a bounded pool of detection workers; each worker runs the
//! match → identity lookup → notify → persist pipeline in isolation from
//! the loop. Matching, identity data, notification relay, and durable
//! storage are external collaborators behind the `domain` traits, with
//! HTTP (and one file-backed) implementations under `infrastructure`.

pub mod capture;
pub mod matching;
pub mod notify;
pub mod pipeline;
pub mod schedule;
pub mod shared;
pub mod storage;
