pub const PROTON_MASS: f64 = 1.007276466;
pub const NEUTRON_MASS: f64 = 1.008664916;

/// Natural abundance of 13C.
pub const C13_ABUNDANCE: f64 = 0.011;
/// Natural abundance of 33S.
pub const S33_ABUNDANCE: f64 = 0.0076;
/// Natural abundance of 34S, the +2 sulfur channel.
pub const S34_ABUNDANCE: f64 = 0.044;
