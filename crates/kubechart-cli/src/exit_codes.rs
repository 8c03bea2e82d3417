//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

#![allow(dead_code)]

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Definition error - the chart definition file could not be loaded
pub const DEFINITION_ERROR: i32 = 2;

/// Chart error - invalid chart descriptor or object
pub const CHART_ERROR: i32 = 3;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Cluster unavailable - helm could not reach Kubernetes
pub const CLUSTER_UNAVAILABLE: i32 = 6;

/// The release name is already in use
pub const ALREADY_INSTALLED: i32 = 7;

/// The release does not exist
pub const NOT_INSTALLED: i32 = 8;

/// Helm failed for another reason
pub const HELM_ERROR: i32 = 9;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
