//! Implements the USB device and task for transporting HID [KeyboardReport]s and [MouseReport]s.
//! Mostly lifted from [embassy_usb] examples.

use portable_atomic::{AtomicBool, Ordering};

use crate::config::{USB_MANUFACTURER, USB_PID, USB_PRODUCT, USB_VID};
use crate::log::{info, warn};
use crate::mouse::MouseState;
use crate::report::Report;
use crate::UPDATES_CHANNEL;

use embassy_futures::join::join3;
use embassy_rp::{
    peripherals::USB,
    usb::{Driver, InterruptHandler},
    bind_interrupts,
};
use embassy_usb::{
    class::hid::{HidReaderWriter, HidWriter, ReportId, RequestHandler, State as HidState},
    control::OutResponse,
    Builder, Handler, UsbDevice,
};
use usbd_hid::descriptor::{KeyboardReport, MouseReport, SerializedDescriptor};

use static_cell::StaticCell;

type MyDriver = Driver<'static, USB>;
type MyUsbDevice = UsbDevice<'static, MyDriver>;
type MyHidReaderWriter = HidReaderWriter<'static, MyDriver, 1, 8>;
type MyMouseWriter = HidWriter<'static, MyDriver, 8>;

bind_interrupts!(pub(crate) struct Irqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
});

pub fn get_device(driver: MyDriver) -> (MyUsbDevice, MyHidReaderWriter, MyMouseWriter) {
    let mut config = embassy_usb::Config::new(USB_VID, USB_PID);
    config.manufacturer = Some(USB_MANUFACTURER);
    config.product = Some(USB_PRODUCT);
    config.serial_number = Some("001");
    config.max_power = 100;
    config.max_packet_size_0 = 64;

    static DEVICE_HANDLER: StaticCell<MyDeviceHandler> = StaticCell::new();

    // Create embassy-usb DeviceBuilder using the driver and config.
    static CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
    static BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
    static CONTROL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
    let mut builder = Builder::new(
        driver,
        config,
        &mut CONFIG_DESC.init([0; 256])[..],
        &mut BOS_DESC.init([0; 256])[..],
        &mut [], // no msos descriptors
        &mut CONTROL_BUF.init([0; 128])[..],
    );

    builder.handler(DEVICE_HANDLER.init(MyDeviceHandler::new()));

    let keyboard = {
        static STATE: StaticCell<HidState> = StaticCell::new();
        let config = embassy_usb::class::hid::Config {
            report_descriptor: KeyboardReport::desc(),
            request_handler: None,
            poll_ms: 1,
            max_packet_size: 64,
        };
        HidReaderWriter::<_, 1, 8>::new(&mut builder, STATE.init(HidState::new()), config)
    };

    let mouse = {
        static STATE: StaticCell<HidState> = StaticCell::new();
        let config = embassy_usb::class::hid::Config {
            report_descriptor: MouseReport::desc(),
            request_handler: None,
            poll_ms: 1,
            max_packet_size: 8,
        };
        HidWriter::<_, 8>::new(&mut builder, STATE.init(HidState::new()), config)
    };

    (builder.build(), keyboard, mouse)
}

#[embassy_executor::task]
pub async fn run(mut usb: MyUsbDevice, keyboard: MyHidReaderWriter, mut mouse: MyMouseWriter) {
    let usb_fut = usb.run();

    let (reader, mut writer) = keyboard.split();

    let in_fut = async {
        let mut last_report = Report::default();
        let mut last_mouse = MouseState::default();
        loop {
            let (report, mouse_state) = UPDATES_CHANNEL.receive().await;
            if report != last_report {
                if let Err(_e) = writer.write_serialize(&KeyboardReport::from(report)).await {
                    warn!("failed to send keyboard report");
                }
                last_report = report;
            }
            if mouse_state != last_mouse || mouse_state.is_moving() {
                if let Err(_e) = mouse.write_serialize(&MouseReport::from(mouse_state)).await {
                    warn!("failed to send mouse report");
                }
                last_mouse = mouse_state;
            }
        }
    };

    let out_fut = async {
        static REQUEST_HANDLER: StaticCell<MyRequestHandler> = StaticCell::new();
        reader.run(false, REQUEST_HANDLER.init(MyRequestHandler {})).await;
    };

    // Run everything concurrently.
    join3(usb_fut, in_fut, out_fut).await;
}

struct MyRequestHandler;

impl RequestHandler for MyRequestHandler {
    fn get_report(&mut self, _id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        None
    }

    /// The host sends its lock LED state here; bit 1 is caps lock
    fn set_report(&mut self, _id: ReportId, data: &[u8]) -> OutResponse {
        if let Some(leds) = data.first() {
            info!("host caps lock {}", leds & 0x02 != 0);
        }
        OutResponse::Accepted
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, _dur: u32) {}

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        None
    }
}

struct MyDeviceHandler {
    configured: AtomicBool,
}

impl MyDeviceHandler {
    fn new() -> Self {
        MyDeviceHandler {
            configured: AtomicBool::new(false),
        }
    }
}

impl Handler for MyDeviceHandler {
    fn enabled(&mut self, enabled: bool) {
        self.configured.store(false, Ordering::Relaxed);
        info!("usb device enabled: {}", enabled);
    }

    fn reset(&mut self) {
        self.configured.store(false, Ordering::Relaxed);
        info!("usb bus reset");
    }

    fn addressed(&mut self, _addr: u8) {
        self.configured.store(false, Ordering::Relaxed);
    }

    fn configured(&mut self, configured: bool) {
        self.configured.store(configured, Ordering::Relaxed);
        info!("usb device configured: {}", configured);
    }
}
