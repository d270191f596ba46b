#![no_std]
#![no_main]

use defmt::{info, warn};
use defmt_rtt as _;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::{UART1, USB};
use embassy_rp::uart::{Async, Config as UartConfig, Uart, UartRx};
use embassy_rp::usb::Driver;
use embassy_time::Delay;
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig};
use serialpad_rp2040::{
    configure_usb_hid, ButtonWithLed, ByteFramer, Dispatcher, EndpointGate, FrameQueue,
    UsbReportTransport,
};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART1_IRQ => embassy_rp::uart::InterruptHandler<UART1>;
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// ISR-to-task hand-off queue. The only shared mutable state crossing
/// the interrupt/task boundary.
static FRAME_QUEUE: FrameQueue = FrameQueue::new();

/// Single-slot flow control for the HID IN endpoint.
static EP_GATE: EndpointGate = EndpointGate::new();

/// High-priority executor for the UART receive path, preempting the
/// thread-mode dispatch task the way a receive ISR would.
static UART_EXECUTOR: InterruptExecutor = InterruptExecutor::new();

/// USB device configuration buffers.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_0() {
    UART_EXECUTOR.on_interrupt()
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Serialpad starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- UART Setup ---
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = 115_200;

    let uart = Uart::new(
        p.UART1,
        p.PIN_8, // TX
        p.PIN_9, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config,
    );
    let (_tx, rx) = uart.split();

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x2FE3, 0x0006);
    usb_config.manufacturer = Some("Serialpad");
    usb_config.product = Some("Serial HID Joystick");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    // Configure HID class
    let hid_state = HID_STATE.init(State::new());
    let hid_writer = configure_usb_hid(&mut builder, hid_state);

    // Build the USB device
    let usb_device = builder.build();

    let transport = UsbReportTransport::new(hid_writer, &EP_GATE);

    // Button on GPIO 16 (active high, pull-down), on-board LED mirror
    let button = ButtonWithLed::new(
        Input::new(p.PIN_16, Pull::Down),
        Output::new(p.PIN_25, Level::Low),
    );

    // UART receive runs above thread mode, standing in for the ISR
    interrupt::SWI_IRQ_0.set_priority(Priority::P2);
    let uart_spawner = UART_EXECUTOR.start(interrupt::SWI_IRQ_0);
    uart_spawner.spawn(uart_rx_task(rx, &FRAME_QUEUE)).unwrap();

    spawner.spawn(usb_task(usb_device)).unwrap();
    spawner.spawn(dispatch_task(transport, button)).unwrap();

    info!("Serialpad initialized, waiting for data...");
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// Producer context: feeds received bytes to the framer one at a time.
///
/// Only ever calls the non-blocking try-enqueue path; a full queue drops
/// the completed frame and the task keeps receiving.
#[embassy_executor::task]
async fn uart_rx_task(mut rx: UartRx<'static, Async>, queue: &'static FrameQueue) {
    let mut framer = ByteFramer::new(queue);
    let mut byte = [0u8; 1];

    loop {
        match rx.read(&mut byte).await {
            Ok(()) => framer.on_byte_received(byte[0]),
            Err(e) => warn!("UART receive error: {:?}", e),
        }
    }
}

/// Consumer task: the dispatch loop.
#[embassy_executor::task]
async fn dispatch_task(mut transport: UsbReportTransport<'static>, button: ButtonWithLed<'static>) {
    // Hold off until the host has enumerated us
    transport.wait_ready().await;
    info!("USB HID ready, dispatching reports");

    let mut dispatcher = Dispatcher::new(&FRAME_QUEUE, &EP_GATE, transport, Delay);
    dispatcher.run(button).await
}
