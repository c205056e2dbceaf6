//! Shared test harness modules for the audience CLI.

use super::*;

mod helpers;
mod segments_steps;
