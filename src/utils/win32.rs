use windows::core::{PCSTR, PCWSTR};
use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};

/// Разрешить экспорт системной библиотеки во время выполнения.
///
/// `None` means the library or the entry point is missing on this system,
/// which callers treat as an unavailable capability, never as an error.
/// The library stays loaded for the lifetime of the process.
pub unsafe fn resolve_export(
    library: PCWSTR,
    name: PCSTR,
) -> Option<unsafe extern "system" fn() -> isize> {
    let module = LoadLibraryW(library).ok()?;
    GetProcAddress(module, name)
}
