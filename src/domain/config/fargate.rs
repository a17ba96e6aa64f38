//! Valid CPU and memory pairings for serverless container tasks.

/// `(cpu units, smallest memory MiB, largest memory MiB, step MiB)`
const SIZES: &[(u32, u32, u32, u32)] = &[
    (256, 512, 2048, 512),
    (512, 1024, 4096, 1024),
    (1024, 2048, 8192, 1024),
    (2048, 4096, 16384, 1024),
    (4096, 8192, 30720, 1024),
    (8192, 16384, 61440, 4096),
    (16384, 32768, 122880, 8192),
];

/// Whether the task size is one the platform can schedule.
///
/// 256 CPU units additionally reject 1536 MiB, which falls on the step grid
/// but is not offered.
pub fn is_valid_task_size(cpu: u32, memory_mib: u32) -> bool {
    if cpu == 256 && memory_mib == 1536 {
        return false;
    }
    SIZES.iter().any(|&(units, min, max, step)| {
        units == cpu && (min..=max).contains(&memory_mib) && (memory_mib - min) % step == 0
    })
}

/// Memory sizes offered for `cpu`, for error messages.
pub fn memory_options(cpu: u32) -> Option<String> {
    SIZES.iter().find(|&&(units, ..)| units == cpu).map(|&(_, min, max, step)| {
        if cpu == 256 {
            "512, 1024, 2048".to_string()
        } else {
            format!("{}..={} in steps of {}", min, max, step)
        }
    })
}

pub fn cpu_options() -> String {
    SIZES.iter().map(|(units, ..)| units.to_string()).collect::<Vec<_>>().join(", ")
}
