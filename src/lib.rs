// World store and mutation notification
pub mod world;

// Per-subscriber mailboxes and broadcast fan-out
pub mod broadcast;

// Wire protocol and subscriber sessions
pub mod subscription;

// HTTP and WebSocket APIs
pub mod api;

// Configuration
pub mod config;
