//! Host invoker identity passed to the local image build.

use crate::domain::registry::DEFAULT_DOCKER_GID;

/// Numeric ids of the user running `devx`, plus the group owning the
/// container runtime socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostIdentity {
    pub uid: u32,
    pub gid: u32,
    pub docker_gid: u32,
}

/// Find the `docker` group id in `/etc/group` content, falling back to
/// [`DEFAULT_DOCKER_GID`] when the group is absent.
#[must_use]
pub fn docker_gid_from_group_file(content: &str) -> u32 {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .find_map(|line| {
            let mut fields = line.split(':');
            let name = fields.next()?;
            let gid = fields.nth(1)?;
            (name.trim() == "docker").then(|| gid.trim().parse().ok())?
        })
        .unwrap_or(DEFAULT_DOCKER_GID)
}

/// Parse the output of `id -u` / `id -g`.
#[must_use]
pub fn parse_id_output(stdout: &str) -> Option<u32> {
    stdout.trim().parse().ok()
}
