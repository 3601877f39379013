//! Names for PE header constants.

use object::pe;

pub fn machine_name(machine: u16) -> Option<&'static str> {
    let name = match machine {
        pe::IMAGE_FILE_MACHINE_I386 => "I386",
        pe::IMAGE_FILE_MACHINE_AMD64 => "AMD64",
        pe::IMAGE_FILE_MACHINE_ARM64 => "ARM64",
        pe::IMAGE_FILE_MACHINE_ARMNT => "ARMNT",
        pe::IMAGE_FILE_MACHINE_ARM => "ARM",
        pe::IMAGE_FILE_MACHINE_THUMB => "THUMB",
        pe::IMAGE_FILE_MACHINE_IA64 => "IA64",
        pe::IMAGE_FILE_MACHINE_EBC => "EBC",
        pe::IMAGE_FILE_MACHINE_RISCV64 => "RISCV64",
        _ => return None,
    };
    Some(name)
}

pub fn subsystem_name(subsystem: u16) -> Option<&'static str> {
    let name = match subsystem {
        pe::IMAGE_SUBSYSTEM_NATIVE => "NATIVE",
        pe::IMAGE_SUBSYSTEM_WINDOWS_GUI => "WINDOWS_GUI",
        pe::IMAGE_SUBSYSTEM_WINDOWS_CUI => "WINDOWS_CUI",
        pe::IMAGE_SUBSYSTEM_OS2_CUI => "OS2_CUI",
        pe::IMAGE_SUBSYSTEM_POSIX_CUI => "POSIX_CUI",
        pe::IMAGE_SUBSYSTEM_WINDOWS_CE_GUI => "WINDOWS_CE_GUI",
        pe::IMAGE_SUBSYSTEM_EFI_APPLICATION => "EFI_APPLICATION",
        pe::IMAGE_SUBSYSTEM_EFI_BOOT_SERVICE_DRIVER => "EFI_BOOT_SERVICE_DRIVER",
        pe::IMAGE_SUBSYSTEM_EFI_RUNTIME_DRIVER => "EFI_RUNTIME_DRIVER",
        pe::IMAGE_SUBSYSTEM_EFI_ROM => "EFI_ROM",
        pe::IMAGE_SUBSYSTEM_XBOX => "XBOX",
        pe::IMAGE_SUBSYSTEM_WINDOWS_BOOT_APPLICATION => "WINDOWS_BOOT_APPLICATION",
        _ => return None,
    };
    Some(name)
}

const FILE_FLAGS: &[(u32, &str)] = &[
    (pe::IMAGE_FILE_RELOCS_STRIPPED as u32, "IMAGE_FILE_RELOCS_STRIPPED"),
    (pe::IMAGE_FILE_EXECUTABLE_IMAGE as u32, "IMAGE_FILE_EXECUTABLE_IMAGE"),
    (pe::IMAGE_FILE_LINE_NUMS_STRIPPED as u32, "IMAGE_FILE_LINE_NUMS_STRIPPED"),
    (pe::IMAGE_FILE_LOCAL_SYMS_STRIPPED as u32, "IMAGE_FILE_LOCAL_SYMS_STRIPPED"),
    (pe::IMAGE_FILE_LARGE_ADDRESS_AWARE as u32, "IMAGE_FILE_LARGE_ADDRESS_AWARE"),
    (pe::IMAGE_FILE_32BIT_MACHINE as u32, "IMAGE_FILE_32BIT_MACHINE"),
    (pe::IMAGE_FILE_DEBUG_STRIPPED as u32, "IMAGE_FILE_DEBUG_STRIPPED"),
    (pe::IMAGE_FILE_SYSTEM as u32, "IMAGE_FILE_SYSTEM"),
    (pe::IMAGE_FILE_DLL as u32, "IMAGE_FILE_DLL"),
];

const DLL_FLAGS: &[(u32, &str)] = &[
    (pe::IMAGE_DLLCHARACTERISTICS_HIGH_ENTROPY_VA as u32, "HIGH_ENTROPY_VA"),
    (pe::IMAGE_DLLCHARACTERISTICS_DYNAMIC_BASE as u32, "DYNAMIC_BASE"),
    (pe::IMAGE_DLLCHARACTERISTICS_FORCE_INTEGRITY as u32, "FORCE_INTEGRITY"),
    (pe::IMAGE_DLLCHARACTERISTICS_NX_COMPAT as u32, "NX_COMPAT"),
    (pe::IMAGE_DLLCHARACTERISTICS_NO_ISOLATION as u32, "NO_ISOLATION"),
    (pe::IMAGE_DLLCHARACTERISTICS_NO_SEH as u32, "NO_SEH"),
    (pe::IMAGE_DLLCHARACTERISTICS_NO_BIND as u32, "NO_BIND"),
    (pe::IMAGE_DLLCHARACTERISTICS_APPCONTAINER as u32, "APPCONTAINER"),
    (pe::IMAGE_DLLCHARACTERISTICS_WDM_DRIVER as u32, "WDM_DRIVER"),
    (pe::IMAGE_DLLCHARACTERISTICS_GUARD_CF as u32, "GUARD_CF"),
    (pe::IMAGE_DLLCHARACTERISTICS_TERMINAL_SERVER_AWARE as u32, "TERMINAL_SERVER_AWARE"),
];

const SECTION_FLAGS: &[(u32, &str)] = &[
    (pe::IMAGE_SCN_CNT_CODE, "IMAGE_SCN_CNT_CODE"),
    (pe::IMAGE_SCN_CNT_INITIALIZED_DATA, "IMAGE_SCN_CNT_INITIALIZED_DATA"),
    (pe::IMAGE_SCN_CNT_UNINITIALIZED_DATA, "IMAGE_SCN_CNT_UNINITIALIZED_DATA"),
    (pe::IMAGE_SCN_MEM_DISCARDABLE, "IMAGE_SCN_MEM_DISCARDABLE"),
    (pe::IMAGE_SCN_MEM_NOT_CACHED, "IMAGE_SCN_MEM_NOT_CACHED"),
    (pe::IMAGE_SCN_MEM_NOT_PAGED, "IMAGE_SCN_MEM_NOT_PAGED"),
    (pe::IMAGE_SCN_MEM_SHARED, "IMAGE_SCN_MEM_SHARED"),
    (pe::IMAGE_SCN_MEM_EXECUTE, "IMAGE_SCN_MEM_EXECUTE"),
    (pe::IMAGE_SCN_MEM_READ, "IMAGE_SCN_MEM_READ"),
    (pe::IMAGE_SCN_MEM_WRITE, "IMAGE_SCN_MEM_WRITE"),
];

fn flag_list(value: u32, table: &[(u32, &str)]) -> String {
    table
        .iter()
        .filter(|(bit, _)| value & bit != 0)
        .map(|(_, name)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// COFF header characteristics as comma-separated flag names.
pub fn file_characteristics(value: u16) -> String {
    flag_list(value as u32, FILE_FLAGS)
}

pub fn dll_characteristics(value: u16) -> String {
    flag_list(value as u32, DLL_FLAGS)
}

pub fn section_characteristics(value: u32) -> String {
    flag_list(value, SECTION_FLAGS)
}
