#![doc = r#"
The messages that make up the body of a track chunk, other than meta events.

# Hierarchy
```text
                 |-------------------|
                 |   Track Message   |
                 |-------------------|
                /         |           \
|---------------|  |------------|  |-------------|
| Channel Voice |  |   SysEx    |  |    Meta     |
|---------------|  |------------|  |-------------|
   (this module)    (this module)   (crate::file::meta)
```
"#]

pub mod channel;
pub mod sysex;
