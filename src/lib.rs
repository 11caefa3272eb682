//! dexsprite - Library for turning raw monster sprite assets into game sprites
//!
//! This library provides functionality to:
//! - Recolor sprites with shiny palettes and expand animation scripts
//! - Assemble animated battle sprites, overworld follower sheets and menu icons
//! - Run those steps over every species of a project, isolating failures

pub mod animation;
pub mod assets;
pub mod battle;
pub mod build;
pub mod canvas;
pub mod cli;
pub mod color;
pub mod config;
pub mod gif;
pub mod icon;
pub mod output;
pub mod overworld;
pub mod palette;
pub mod species;
pub mod spritesheet;
