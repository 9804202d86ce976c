//! System action module.
//!
//! The structured output of the policy engine: an action tag plus an
//! ordered, multi-valued slot mapping, handed to the rendering layer.

mod sys_act;

pub use sys_act::{SysAct, SysActType, NONE_VALUE, NOT_AVAILABLE};
