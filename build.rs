fn main() {
    // Only run on Windows
    #[cfg(target_os = "windows")]
    {
        // Version metadata shown in the executable's properties dialog
        let mut res = winresource::WindowsResource::new();
        res.set("ProductName", "AFK Auto-Help");
        res.set("FileDescription", "Timed feeding and auto-chop automation aide");
        res.set("LegalCopyright", "Copyright (c) 2024");
        if let Err(e) = res.compile() {
            println!("cargo:warning=failed to embed Windows resources: {e}");
        }
    }
}
