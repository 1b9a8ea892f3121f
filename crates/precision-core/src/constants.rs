//! Physical constants and tuning parameters.

// --- Physics ---

/// Standard gravity (m/s²), used for g-load conversions.
pub const G0: f64 = 9.81;

/// Earth standard gravitational parameter (m³/s²).
pub const GM_EARTH: f64 = 3.986_004_418e14;

/// Moon standard gravitational parameter (m³/s²).
pub const GM_MOON: f64 = 4.902_869_5e12;

/// Mars standard gravitational parameter (m³/s²).
pub const GM_MARS: f64 = 4.282_837e13;

/// Mean Earth radius (meters).
pub const R_EARTH: f64 = 6.371e6;

/// Earth equatorial radius (meters), reference radius for zonal harmonics.
pub const EARTH_EQUATORIAL_RADIUS: f64 = 6.378_137e6;

/// Moon mean radius (meters).
pub const R_MOON: f64 = 1.7374e6;

/// Mars mean radius (meters).
pub const R_MARS: f64 = 3.3895e6;

/// Earth zonal harmonic coefficients.
pub const EARTH_J2: f64 = 1.082_63e-3;
pub const EARTH_J3: f64 = -2.54e-6;
pub const EARTH_J4: f64 = -1.62e-6;

/// Mars oblateness coefficient.
pub const MARS_J2: f64 = 1.96e-3;

// --- Atmosphere ---

/// Sea-level air density (kg/m³).
pub const SEA_LEVEL_DENSITY: f64 = 1.225;

/// Density scale height of the exponential atmosphere (meters).
pub const ATMOSPHERE_SCALE_HEIGHT: f64 = 8_500.0;

/// Altitude above which the atmosphere is treated as vacuum (meters).
pub const ATMOSPHERE_CEILING: f64 = 1_000_000.0;

/// Residual density above the ceiling (kg/m³).
pub const VACUUM_DENSITY: f64 = 1e-15;

/// Speed of sound at sea level (m/s).
pub const SPEED_OF_SOUND_SEA_LEVEL: f64 = 343.0;

/// Hydrostatic constant g0·M/R* of the 1976 standard atmosphere (K/km).
pub const US76_HYDROSTATIC_CONSTANT: f64 = 34.1632;

// --- Environment bands (altitude above mean Earth radius) ---

/// Ceiling of the low-atmosphere band (meters).
pub const LOW_ATMOSPHERE_CEILING: f64 = 20_000.0;

/// Kármán line: conventional boundary between atmosphere and space (meters).
pub const KARMAN_LINE: f64 = 100_000.0;

/// Ceiling of the low Earth orbit band (meters).
pub const LEO_CEILING: f64 = 2_000_000.0;

/// Geostationary altitude (meters).
pub const GEO_ALTITUDE: f64 = 35_786_000.0;

/// Half-width of the band treated as geostationary (meters).
pub const GEO_BAND_WIDTH: f64 = 1_000_000.0;

/// Ceiling of cislunar space (meters, ~2.6x lunar distance).
pub const CISLUNAR_CEILING: f64 = 1_000_000_000.0;

// --- Interceptor defaults ---

/// Default guidance update rate (Hz).
pub const DEFAULT_UPDATE_RATE_HZ: u32 = 100;

/// Default look-ahead horizon for target prediction (seconds).
pub const DEFAULT_LOOK_AHEAD_SECS: u64 = 30;

// --- Target tracking ---

/// Kalman filter state dimension: position, velocity, acceleration per axis.
pub const TRACKER_STATE_DIM: usize = 9;

/// Number of directly observed states (position and velocity).
pub const TRACKER_OBSERVED_DIM: usize = 6;

/// Maximum number of raw observations retained per target.
pub const TRACKER_HISTORY_LEN: usize = 100;

/// Initial covariance diagonal (broad uncertainty).
pub const TRACKER_INITIAL_VARIANCE: f64 = 10_000.0;

/// Process noise diagonal terms (units² per second).
pub const PROCESS_NOISE_POSITION: f64 = 1.0;
pub const PROCESS_NOISE_VELOCITY: f64 = 10.0;
pub const PROCESS_NOISE_ACCELERATION: f64 = 100.0;

/// Measurement variances: 10 m position, 1 m/s velocity accuracy.
pub const MEASUREMENT_VARIANCE_POSITION: f64 = 100.0;
pub const MEASUREMENT_VARIANCE_VELOCITY: f64 = 1.0;

/// Upper bound on samples returned by a predicted path.
pub const TRACKER_MAX_PATH_SAMPLES: usize = 10_000;

/// Time step used when an observation has no usable timestamp delta (seconds).
pub const TRACKER_DEFAULT_DT: f64 = 0.1;

/// Acceleration change between samples that counts as a maneuver (m/s²).
pub const MANEUVER_ACCEL_THRESHOLD: f64 = 5.0;

/// Maneuver probability increase on a detected maneuver.
pub const MANEUVER_PROBABILITY_GAIN: f64 = 0.3;

/// Maneuver probability decay on a quiet sample.
pub const MANEUVER_PROBABILITY_DECAY: f64 = 0.1;

/// Confidence lost per second of prediction look-ahead.
pub const PREDICTION_CONFIDENCE_DECAY: f64 = 0.1;

// --- Guidance laws ---

/// Navigation constant for classic proportional navigation.
pub const PRONAV_NAVIGATION_CONSTANT: f64 = 3.0;

/// Navigation constant for augmented proportional navigation.
pub const AUG_PRONAV_NAVIGATION_CONSTANT: f64 = 4.0;

/// Navigation constant for true proportional navigation.
pub const TPN_NAVIGATION_CONSTANT: f64 = 4.0;

/// Smallest time-to-go used as a divisor in ZEM and optimal guidance (seconds).
pub const MIN_TIME_TO_GO_SECS: f64 = 0.1;

/// Time-to-go reported when the target is not closing (seconds).
pub const NOT_CLOSING_TIME_TO_GO_SECS: u64 = 999;

// --- Mission planning ---

/// Delta-V budget used when constraints leave it unset (m/s).
pub const DEFAULT_MAX_DELTA_V: f64 = 5_000.0;

/// Flight-time limit used when constraints leave it unset (seconds).
pub const DEFAULT_MAX_FLIGHT_TIME_SECS: u64 = 300;

/// Delay between launch and the main burn waypoint (seconds).
pub const DEFAULT_BURN_OFFSET_SECS: u64 = 10;

/// Fraction of the delta-V budget spent at the main burn.
pub const DEFAULT_BURN_FRACTION: f64 = 0.8;

/// Shortest flight time the intercept solver considers (seconds).
pub const SOLVER_MIN_FLIGHT_TIME_SECS: u64 = 10;

/// Flight-time scan step (seconds).
pub const SOLVER_TIME_STEP_SECS: u64 = 1;

/// Upper bound on candidate evaluations in one solve.
pub const SOLVER_MAX_ITERATIONS: usize = 100_000;

/// Golden-section refinement steps around the best scanned candidate.
pub const SOLVER_REFINE_ITERATIONS: usize = 24;

/// Mean transfer speed above which a candidate is discarded (m/s).
pub const SOLVER_MAX_TRANSFER_SPEED: f64 = 50_000.0;

/// Flight time beyond which feasibility is penalized (seconds).
pub const SOLVER_PREFERRED_FLIGHT_TIME: f64 = 50.0;

/// Closing speed below which feasibility is penalized (m/s).
pub const SOLVER_REFERENCE_CLOSING_SPEED: f64 = 500.0;

// --- Engagement simulation ---

/// Simulation tick rate (Hz). Matches the default guidance update rate.
pub const SIM_TICK_RATE: u32 = 100;

/// Seconds per simulation tick.
pub const SIM_DT: f64 = 1.0 / SIM_TICK_RATE as f64;

/// Default engagement time limit (seconds).
pub const SIM_MAX_DURATION_SECS: f64 = 120.0;

/// Default tracking time before launch (seconds).
pub const SIM_TRACK_WARMUP_SECS: f64 = 10.0;

/// Default lethal radius for a hit (meters).
pub const SIM_LETHAL_RADIUS: f64 = 10.0;

/// Payload mass never drops below this fraction of its launch mass.
pub const SIM_MIN_MASS_FRACTION: f64 = 0.1;
