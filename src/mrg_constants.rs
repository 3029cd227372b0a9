//! Named coefficient catalogues for the MRG family (spec §6.3).
//!
//! Every vector below is reproduced verbatim from the corresponding `.cc`
//! file in the original `trng` source (file names noted per constant).

/// `mrg2` (modulus `2^31 - 1`). Source: `trng/mrg2.cc`.
pub mod mrg2 {
    pub const LECUYER1: [i64; 2] = [1_498_809_829, 1_160_990_996];
    pub const LECUYER2: [i64; 2] = [46_325, 1_084_587];
}

/// `mrg3` (modulus `2^31 - 1`). Source: `trng/mrg3.cc`.
pub mod mrg3 {
    pub const LECUYER1: [i64; 3] = [2_021_422_057, 1_826_992_351, 1_977_753_457];
    pub const LECUYER2: [i64; 3] = [1_476_728_729, 0, 1_155_643_113];
    pub const LECUYER3: [i64; 3] = [65_338, 0, 64_636];
}

/// `mrg4` (modulus `2^31 - 1`). Source: `trng/yarn4.cc` — `yarn4` wraps the
/// `mrg4` recurrence unchanged (spec §3.3), and the `mrg4.cc` translation
/// unit carrying these same two constants was not retrieved, but the
/// coefficient vectors themselves are recurrence parameters, not YARN-layer
/// constants, so reusing them here reproduces `mrg4` exactly rather than
/// fabricating a value.
pub mod mrg4 {
    pub const LECUYER1: [i64; 4] = [2_001_982_722, 1_412_284_257, 1_155_380_217, 1_668_339_922];
    pub const LECUYER2: [i64; 4] = [64_886, 0, 0, 64_322];
}

/// `mrg5` / `yarn5` (modulus `2^31 - 1`). Source: `trng/yarn5.cc`.
pub mod mrg5 {
    pub const LECUYER1: [i64; 5] = [107_374_182, 0, 0, 0, 104_480];
}

/// `mrg3s` / `yarn3s` (modulus `2^31 - 21069`). Source: `trng/yarn3s.cc`
/// (`yarn3s` wraps the `mrg3s` recurrence unchanged, spec §3.3, so the two
/// named vectors it defines — `trng0`, `trng1` — are `mrg3s`'s own
/// coefficient catalogue).
pub mod mrg3s {
    pub const TRNG0: [i64; 3] = [2_025_213_985, 1_112_953_677, 2_038_969_601];
    pub const TRNG1: [i64; 3] = [1_287_767_370, 1_045_931_779, 58_150_106];
}

/// `mrg5s` / `yarn5s` (modulus `2^31 - 22641`). Source: `trng/yarn5s.cc`,
/// verbatim with spec §6.3's own `yarn5s` table entries.
pub mod mrg5s {
    pub const TRNG0: [i64; 5] =
        [1_053_223_373, 1_530_818_118, 1_612_122_482, 133_497_989, 573_245_311];
    pub const TRNG1: [i64; 5] =
        [2_068_619_238, 2_138_332_912, 671_754_166, 1_442_240_992, 1_526_958_817];
}
