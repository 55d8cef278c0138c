// Collaborator boundaries the pipeline depends on; adapters live in `infra`.
pub mod ports;
