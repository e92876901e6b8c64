//! Launchpad Core
//!
//! Core types shared by the Launchpad deployment pipeline and the task API.
//!
//! This crate contains:
//! - Domain types: Deployment target, inventory, evidence phases, deployment
//!   variables, tasks and categories
//! - DTOs: Request/response bodies exchanged with the task API

pub mod domain;
pub mod dto;
