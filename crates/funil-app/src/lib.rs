// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod forms;
pub mod ids;
pub mod kanban;
pub mod model;
pub mod state;
pub mod store;

pub use forms::*;
pub use ids::*;
pub use kanban::*;
pub use model::*;
pub use state::*;
pub use store::*;
