//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Ctxa.
//! The Ctxa project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Modules
//!
//! The built-in providers a specification can name.
//!
//! ## Module Table
//!
//! - **corpora**: named word lists from a corpus provider (data)
//! - **data**: inline data carried by the specification (data)
//! - **date**: the run's instant or a fixed one, and date components (data, modifier)
//! - **switch**: branch selection on an expression (data, modifier)
//! - **environment**: values from the environment record (data)
//! - **path**: dot/bracket queries into structured values (filter, modifier)

pub mod corpora;
pub mod data;
pub mod date;
pub mod environment;
pub mod path;
pub mod switch;
