// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod dates;
pub mod draft;
pub mod fees;
pub mod filter;
pub mod ids;
pub mod ledger;
pub mod model;
pub mod money;
pub mod state;

pub use dates::*;
pub use draft::*;
pub use fees::*;
pub use filter::*;
pub use ids::*;
pub use ledger::*;
pub use model::*;
pub use money::*;
pub use state::*;
