//! Registry implementations for listing image tags

pub mod docker_hub;
pub mod oci;

pub use docker_hub::DockerHubRegistry;
pub use oci::OciRegistry;
