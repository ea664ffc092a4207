pub mod mediator {
    pub mod stats;
}

// Re-export commonly used services for convenience
pub use mediator::stats::MediatorService;
