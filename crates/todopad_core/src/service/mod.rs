//! Use-case services over the store port.
//!
//! # Responsibility
//! - Keep page and task state consistent with the store.
//! - Stay storage-agnostic: services only see `KvStore`.

pub mod page_registry;
pub mod task_list;
