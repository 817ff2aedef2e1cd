// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Tokio-based task spawning for credsign.
//!
//! This crate provides `TokioSpawn`, which implements the `Spawn` trait from
//! `credsign_core` on top of the Tokio runtime the caller is running in.
//!
//! Credential caches hand their refresh attempts to the spawner, so a refresh
//! keeps running after the reader that started it is cancelled.
//!
//! ## Example
//!
//! ```no_run
//! use credsign_core::Context;
//! use credsign_spawn_tokio::TokioSpawn;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ctx = Context::new().with_spawn(TokioSpawn);
//!
//!     ctx.spawn(async { println!("running in the background") })
//!         .expect("must be inside a tokio runtime");
//! }
//! ```

use std::future::Future;
use std::pin::Pin;

use credsign_core::{Error, Result, Spawn};
use tokio::runtime::Handle;

/// Tokio-based implementation of the `Spawn` trait.
///
/// Tasks are spawned on the runtime of the calling thread and detached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawn;

impl Spawn for TokioSpawn {
    fn spawn(&self, fut: Pin<Box<dyn Future<Output = ()> + Send + 'static>>) -> Result<()> {
        let handle = Handle::try_current().map_err(|e| {
            Error::unexpected("failed to spawn task: no tokio runtime found").with_source(e)
        })?;

        // Dropping the JoinHandle detaches the task.
        drop(handle.spawn(fut));
        Ok(())
    }
}
