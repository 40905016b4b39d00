// Primary interface selection

use crate::host::InterfaceInfo;

/// Up + default route + non-loopback IPv4, else first up, else first known.
/// `None` when no interfaces are known; callers fall back to a configured name.
pub fn select_primary(interfaces: &[InterfaceInfo]) -> Option<&InterfaceInfo> {
    interfaces
        .iter()
        .find(|i| i.is_up && i.has_default_route && i.has_external_ipv4())
        .or_else(|| interfaces.iter().find(|i| i.is_up))
        .or_else(|| interfaces.first())
}
