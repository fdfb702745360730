//! PDG Monte Carlo numbering helpers.
//!
//! Only the pieces needed to interpret a hadronization event record:
//! hadron classification from the code's digit structure, and display
//! names for the species a light-quark string commonly produces.

use std::borrow::Cow;

/// Charged pion code.
pub const PI_PLUS: i32 = 211;
/// Neutral pion code.
pub const PI_ZERO: i32 = 111;

/// Returns true if `pdg_id` denotes a hadron.
///
/// Codes up to 100 (quarks, leptons, gauge bosons, diquark-free specials),
/// the 1 000 000–9 000 000 excited/SUSY band and everything from 9 900 000
/// up are excluded. `K_L0` (130) and `K_S0` (310) are hadrons despite the
/// zero digit. Otherwise the code needs non-zero `n_J`, `n_q3` and `n_q2`
/// digits.
#[must_use]
pub fn is_hadron(pdg_id: i32) -> bool {
    let id = pdg_id.unsigned_abs();
    if id <= 100 || (1_000_000..=9_000_000).contains(&id) || id >= 9_900_000 {
        return false;
    }
    if id == 130 || id == 310 {
        return true;
    }
    id % 10 != 0 && (id / 10) % 10 != 0 && (id / 100) % 10 != 0
}

/// Returns true for charged or neutral pions.
#[inline]
#[must_use]
pub fn is_pion(pdg_id: i32) -> bool {
    matches!(pdg_id.abs(), PI_ZERO | PI_PLUS)
}

/// Display name for a PDG code, `ID:<code>` when unknown.
#[must_use]
pub fn particle_name(pdg_id: i32) -> Cow<'static, str> {
    let name = match pdg_id {
        1 => "d",
        -1 => "dbar",
        2 => "u",
        -2 => "ubar",
        3 => "s",
        -3 => "sbar",
        4 => "c",
        -4 => "cbar",
        5 => "b",
        -5 => "bbar",
        11 => "e-",
        -11 => "e+",
        12 => "nu_e",
        -12 => "nu_ebar",
        13 => "mu-",
        -13 => "mu+",
        14 => "nu_mu",
        -14 => "nu_mubar",
        21 => "g",
        22 => "gamma",
        90 => "system",
        111 => "pi0",
        211 => "pi+",
        -211 => "pi-",
        113 => "rho0",
        213 => "rho+",
        -213 => "rho-",
        221 => "eta",
        223 => "omega",
        331 => "eta'",
        333 => "phi",
        130 => "K_L0",
        310 => "K_S0",
        311 => "K0",
        -311 => "Kbar0",
        321 => "K+",
        -321 => "K-",
        313 => "K*0",
        -313 => "K*bar0",
        323 => "K*+",
        -323 => "K*-",
        2212 => "p+",
        -2212 => "pbar-",
        2112 => "n0",
        -2112 => "nbar0",
        1114 => "Delta-",
        -1114 => "Deltabar+",
        2114 => "Delta0",
        -2114 => "Deltabar0",
        2214 => "Delta+",
        -2214 => "Deltabar-",
        2224 => "Delta++",
        -2224 => "Deltabar--",
        3122 => "Lambda0",
        -3122 => "Lambdabar0",
        3112 => "Sigma-",
        -3112 => "Sigmabar+",
        3212 => "Sigma0",
        -3212 => "Sigmabar0",
        3222 => "Sigma+",
        -3222 => "Sigmabar-",
        3312 => "Xi-",
        -3312 => "Xibar+",
        3322 => "Xi0",
        -3322 => "Xibar0",
        3334 => "Omega-",
        -3334 => "Omegabar+",
        _ => return Cow::Owned(format!("ID:{pdg_id}")),
    };
    Cow::Borrowed(name)
}
