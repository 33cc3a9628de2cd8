//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements both [`ConfigPort`] and [`StoragePort`] for the accessory.
//!
//! - Config validation: every field is range-checked before persistence.
//! - Namespace isolation: each LED endpoint stores its characteristics
//!   under its own namespace (`"led0"`, `"led1"`, …); accessory config
//!   lives in `"xiaolight"`.
//! - Atomic writes: ESP-IDF NVS commits are atomic per `nvs_commit()`.
//!
//! On host targets the backend is an in-memory map, so controllers and
//! the service can be tested end to end.

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::AccessoryConfig;
use log::info;

#[cfg(target_os = "espidf")]
use log::warn;

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const CONFIG_NAMESPACE: &str = "xiaolight";
const CONFIG_KEY: &str = "acccfg";

/// Upper bound on an encoded [`AccessoryConfig`].
#[cfg(target_os = "espidf")]
const CONFIG_BLOB_MAX: usize = 256;

/// NVS namespace and key names are limited to 15 bytes plus NUL.
#[cfg(target_os = "espidf")]
const NVS_NAME_LEN: usize = 16;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: std::cell::RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsAdapter {
    /// Create a new NvsAdapter and initialise NVS flash.
    ///
    /// On first boot or after a version mismatch the partition is erased
    /// and re-initialised.  Returns `Err(ConfigError::IoError)` if that
    /// fails too.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase run from the main
            // task before any other NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(ConfigError::IoError);
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: std::cell::RefCell::new(HashMap::new()),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// NUL-terminated copy of an NVS name, truncated to 15 bytes.
    #[cfg(target_os = "espidf")]
    fn c_name(name: &str) -> [u8; NVS_NAME_LEN] {
        let mut buf = [0u8; NVS_NAME_LEN];
        let bytes = name.as_bytes();
        let len = bytes.len().min(NVS_NAME_LEN - 1);
        buf[..len].copy_from_slice(&bytes[..len]);
        buf
    }

    /// Open an NVS namespace, run `f` with the handle, then close it.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(namespace: &str, write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let ns = Self::c_name(namespace);
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let mut handle: nvs_handle_t = 0;
        // SAFETY: `ns` is NUL-terminated and outlives the call.
        let ret = unsafe { nvs_open(ns.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }

    #[cfg(target_os = "espidf")]
    fn commit(handle: nvs_handle_t) -> Result<(), i32> {
        match unsafe { nvs_commit(handle) } {
            ESP_OK => Ok(()),
            ret => Err(ret),
        }
    }

    /// Drop every stored characteristic of one endpoint, reverting it to
    /// defaults on the next boot.
    #[cfg(target_os = "espidf")]
    pub fn erase_namespace(&mut self, namespace: &str) -> Result<(), StorageError> {
        Self::with_nvs_handle(namespace, true, |handle| {
            let ret = unsafe { nvs_erase_all(handle) };
            if ret != ESP_OK {
                return Err(ret);
            }
            Self::commit(handle)
        })
        .map_err(|_| StorageError::IoError)?;
        info!("NvsAdapter: erased namespace '{}'", namespace);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn erase_namespace(&mut self, namespace: &str) -> Result<(), StorageError> {
        let prefix = format!("{}::", namespace);
        self.store.borrow_mut().retain(|k, _| !k.starts_with(&prefix));
        info!("NvsAdapter: erased namespace '{}'", namespace);
        Ok(())
    }
}

fn validate_config(cfg: &AccessoryConfig) -> Result<(), ConfigError> {
    if !(1..=20).contains(&cfg.identify_blinks) {
        return Err(ConfigError::ValidationFailed("identify_blinks must be 1–20"));
    }
    if !(50..=2000).contains(&cfg.identify_half_period_ms) {
        return Err(ConfigError::ValidationFailed(
            "identify_half_period_ms must be 50–2000",
        ));
    }
    if !(100..=40_000).contains(&cfg.pwm_freq_hz) {
        return Err(ConfigError::ValidationFailed("pwm_freq_hz must be 100–40000"));
    }
    let pins = cfg.claimed_gpios();
    for (i, pin) in pins.iter().enumerate() {
        if pins[i + 1..].contains(pin) {
            return Err(ConfigError::ValidationFailed("GPIO assignments must be distinct"));
        }
    }
    Ok(())
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<AccessoryConfig, ConfigError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let key = Self::composite_key(CONFIG_NAMESPACE, CONFIG_KEY);
            match self.store.borrow().get(&key) {
                Some(bytes) => {
                    let cfg: AccessoryConfig =
                        postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
                    info!("NvsAdapter: loaded config from store");
                    Ok(cfg)
                }
                None => {
                    info!("NvsAdapter: no stored config, using defaults");
                    Ok(AccessoryConfig::default())
                }
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let mut buf = [0u8; CONFIG_BLOB_MAX];
            let key = Self::c_name(CONFIG_KEY);
            let result = Self::with_nvs_handle(CONFIG_NAMESPACE, false, |handle| {
                let mut size = buf.len();
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        key.as_ptr() as *const _,
                        buf.as_mut_ptr() as *mut _,
                        &mut size,
                    )
                };
                match ret {
                    ESP_OK => Ok(size),
                    e => Err(e),
                }
            });

            match result {
                Ok(size) => {
                    let cfg: AccessoryConfig =
                        postcard::from_bytes(&buf[..size]).map_err(|_| ConfigError::Corrupted)?;
                    info!("NvsAdapter: loaded config from NVS ({} bytes)", size);
                    Ok(cfg)
                }
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => {
                    info!("NvsAdapter: no stored config, using defaults");
                    Ok(AccessoryConfig::default())
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS read error {}, using defaults", e);
                    Ok(AccessoryConfig::default())
                }
            }
        }
    }

    fn save(&self, config: &AccessoryConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;

        #[cfg(not(target_os = "espidf"))]
        {
            let key = Self::composite_key(CONFIG_NAMESPACE, CONFIG_KEY);
            self.store.borrow_mut().insert(key, bytes);
            info!("NvsAdapter: config saved (simulation)");
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let key = Self::c_name(CONFIG_KEY);
            let result = Self::with_nvs_handle(CONFIG_NAMESPACE, true, |handle| {
                let ret = unsafe {
                    nvs_set_blob(
                        handle,
                        key.as_ptr() as *const _,
                        bytes.as_ptr() as *const _,
                        bytes.len(),
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Self::commit(handle)
            });
            match result {
                Ok(()) => {
                    info!("NvsAdapter: config saved to NVS ({} bytes)", bytes.len());
                    Ok(())
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS write error {}", e);
                    Err(ConfigError::IoError)
                }
            }
        }
    }
}

impl StoragePort for NvsAdapter {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            match self.store.borrow().get(&composite) {
                Some(data) => {
                    let len = data.len().min(buf.len());
                    buf[..len].copy_from_slice(&data[..len]);
                    Ok(len)
                }
                None => Err(StorageError::NotFound),
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let key = Self::c_name(key);
            let result = Self::with_nvs_handle(namespace, false, |handle| {
                let mut size = buf.len();
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        key.as_ptr() as *const _,
                        buf.as_mut_ptr() as *mut _,
                        &mut size,
                    )
                };
                match ret {
                    ESP_OK => Ok(size),
                    e => Err(e),
                }
            });
            match result {
                Ok(size) => Ok(size),
                // A namespace that was never written cannot be opened read-only.
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => Err(StorageError::NotFound),
                Err(_) => Err(StorageError::IoError),
            }
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            self.store.borrow_mut().insert(composite, data.to_vec());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let key = Self::c_name(key);
            Self::with_nvs_handle(namespace, true, |handle| {
                let ret = unsafe {
                    nvs_set_blob(
                        handle,
                        key.as_ptr() as *const _,
                        data.as_ptr() as *const _,
                        data.len(),
                    )
                };
                match ret {
                    ESP_OK => Self::commit(handle),
                    e => Err(e),
                }
            })
            .map_err(|e| {
                if e == ESP_ERR_NVS_NOT_ENOUGH_SPACE {
                    StorageError::Full
                } else {
                    StorageError::IoError
                }
            })
        }
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            self.store.borrow_mut().remove(&composite);
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let key = Self::c_name(key);
            Self::with_nvs_handle(namespace, true, |handle| {
                let ret = unsafe { nvs_erase_key(handle, key.as_ptr() as *const _) };
                if ret != ESP_OK && ret != ESP_ERR_NVS_NOT_FOUND {
                    return Err(ret);
                }
                Self::commit(handle)
            })
            .map_err(|_| StorageError::IoError)
        }
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            self.store.borrow().contains_key(&composite)
        }

        #[cfg(target_os = "espidf")]
        {
            let key = Self::c_name(key);
            Self::with_nvs_handle(namespace, false, |handle| {
                let ret =
                    unsafe { nvs_find_key(handle, key.as_ptr() as *const _, core::ptr::null_mut()) };
                Ok(ret == ESP_OK)
            })
            .unwrap_or(false)
        }
    }
}
