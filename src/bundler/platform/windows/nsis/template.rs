//! NSI script template.

pub(super) const NSI_TEMPLATE: &str = r#"Unicode true
!include "MUI2.nsh"

!ifndef OUTPUT_FILE
  !define OUTPUT_FILE "{{installer_name}}"
!endif

Name "{{formal_name}}"
OutFile "${OUTPUT_FILE}"
InstallDir "{{install_dir}}"
RequestExecutionLevel user
SetCompressor /SOLID lzma

VIProductVersion "{{version_nsis}}"
VIAddVersionKey "ProductName" "{{formal_name}}"
VIAddVersionKey "CompanyName" "{{publisher}}"
VIAddVersionKey "FileDescription" "{{description}}"
VIAddVersionKey "FileVersion" "{{version}}"
VIAddVersionKey "ProductVersion" "{{version}}"
{{#if copyright}}VIAddVersionKey "LegalCopyright" "{{copyright}}"
{{/if}}
!insertmacro MUI_PAGE_DIRECTORY
!insertmacro MUI_PAGE_INSTFILES
!insertmacro MUI_UNPAGE_CONFIRM
!insertmacro MUI_UNPAGE_INSTFILES
!insertmacro MUI_LANGUAGE "English"

Section "Install"
  SetOutPath "$INSTDIR"
  File /r "src\*"
  WriteUninstaller "$INSTDIR\uninstall.exe"
  CreateShortCut "{{shortcut}}" "{{main_exe}}"
SectionEnd

Section "Uninstall"
  Delete "{{shortcut}}"
  RMDir /r "$INSTDIR"
SectionEnd
"#;
