//! Integration and property test suite for the budget engine.
//!
//! Tests drive a [`Keeper`](budget_keeper::Keeper) over an in-memory store and
//! bank block by block, the way a host chain's begin-block hook would.

pub mod helpers;
